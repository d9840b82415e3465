use std::ops::Index;

///
/// One value per screen column. `NaN` marks a column no record contributed to,
/// which is distinct from a computed zero.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenScores(Vec<f32>);

impl ScreenScores {
    pub fn new(scores: Vec<f32>) -> Self {
        ScreenScores(scores)
    }

    ///
    /// All-`NaN` scores, i.e. a viewport without data
    ///
    pub fn empty(width: usize) -> Self {
        ScreenScores(vec![f32::NAN; width])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    ///
    /// Apply `f` to every column, `NaN` columns included.
    ///
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> ScreenScores {
        ScreenScores(self.0.iter().map(|&x| f(x)).collect())
    }

    ///
    /// Smallest and largest non-`NaN` score, `None` if every column is empty.
    ///
    pub fn range(&self) -> Option<(f32, f32)> {
        self.0
            .iter()
            .filter(|x| !x.is_nan())
            .fold(None, |acc, &x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })
    }
}

impl Index<usize> for ScreenScores {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<f32> for ScreenScores {
    fn from_iter<T: IntoIterator<Item = f32>>(iter: T) -> Self {
        ScreenScores(iter.into_iter().collect())
    }
}
