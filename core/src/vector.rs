use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-length real-valued vector. Length is set at construction; components
/// can only be changed in place through [`Vector::set`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    elements: Vec<f64>,
}

impl Vector {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.elements.len() }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }

    pub fn as_slice(&self) -> &[f64] { &self.elements }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> { self.elements.iter() }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.elements
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange { index, len: self.elements.len() })
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.elements.len();
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange { index, len }),
        }
    }

    /// Euclidean norm; 0.0 for an empty vector.
    pub fn norm(&self) -> f64 {
        self.elements.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Sum of pairwise products. Mismatched lengths are truncated to the shorter one.
    pub fn dot(&self, other: &Vector) -> f64 {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cosine similarity, or 0.0 when either norm is zero.
    pub fn cossim(&self, other: &Vector) -> f64 {
        let denominator = self.norm() * other.norm();
        if denominator == 0.0 {
            0.0
        } else {
            self.dot(other) / denominator
        }
    }

    /// Component pairs at positions where both vectors are nonzero, in positional order.
    pub fn boolean_intersect(&self, other: &Vector) -> Vec<(f64, f64)> {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .filter(|(a, b)| **a != 0.0 && **b != 0.0)
            .map(|(a, b)| (*a, *b))
            .collect()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(elements: Vec<f64>) -> Self { Self { elements } }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self { elements: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter { self.elements.iter() }
}

impl AsRef<[f64]> for Vector {
    fn as_ref(&self) -> &[f64] { &self.elements }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, "]")
    }
}
