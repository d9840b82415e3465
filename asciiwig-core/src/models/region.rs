use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CoreError;

///
/// Region struct, a query interval in 1-based, end-inclusive coordinates
/// (the way a user types `chr7:5540000-5570000`).
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chrom: String,
    pub from: u32,
    pub to: u32,
}

impl Region {
    pub fn new(chrom: &str, from: u32, to: u32) -> Result<Self, CoreError> {
        let region = Region {
            chrom: chrom.to_string(),
            from,
            to,
        };
        if from < 1 || from > to {
            return Err(CoreError::InvalidRegion(region.as_string()));
        }
        Ok(region)
    }

    ///
    /// Number of bases covered by the region
    ///
    pub fn width(&self) -> u32 {
        self.to - self.from + 1
    }

    pub fn contains(&self, pos: u32) -> bool {
        pos >= self.from && pos <= self.to
    }

    pub fn as_string(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.from, self.to)
    }
}

impl FromStr for Region {
    type Err = CoreError;

    ///
    /// Parse `chrom:from-to` or `chrom:pos`. Thousands separators are accepted.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chrom, span) = s
            .rsplit_once(':')
            .ok_or_else(|| CoreError::RegionParseError(s.to_string()))?;

        if chrom.is_empty() {
            return Err(CoreError::RegionParseError(s.to_string()));
        }

        let parse_pos = |x: &str| -> Result<u32, CoreError> {
            x.replace(',', "")
                .parse::<u32>()
                .map_err(|_| CoreError::RegionParseError(s.to_string()))
        };

        let (from, to) = match span.split_once('-') {
            Some((from, to)) => (parse_pos(from)?, parse_pos(to)?),
            None => {
                let pos = parse_pos(span)?;
                (pos, pos)
            }
        };

        Region::new(chrom, from, to)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
