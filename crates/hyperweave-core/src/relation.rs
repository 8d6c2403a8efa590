//! Relation types: directed, value-bearing links between a hyperedge and an element

use crate::element::Element;
use crate::error::{Error, Result};
use crate::identity::{ElementKey, Guid, IdentityRecord, Suid};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a relation as seen from its hyperedge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Relates in both directions
    #[default]
    Undefined,
    In,
    Out,
}

impl Direction {
    /// Symbol used when deriving relation labels
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Undefined => "--",
            Self::In => "<-",
            Self::Out => "->",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, Self::Undefined | Self::In)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, Self::Undefined | Self::Out)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "--" => Ok(Self::Undefined),
            "<-" => Ok(Self::In),
            "->" => Ok(Self::Out),
            other => Err(Error::InvalidRelationDirection(other.to_string())),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::In),
            2 => Ok(Self::Out),
            other => Err(Error::InvalidRelationDirection(other.to_string())),
        }
    }
}

/// Payload carried by a relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationValue {
    Scalar(f64),
    Series(Vec<f64>),
}

impl Default for RelationValue {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl From<f64> for RelationValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<i32> for RelationValue {
    fn from(v: i32) -> Self {
        Self::Scalar(f64::from(v))
    }
}

impl From<Vec<f64>> for RelationValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Series(v)
    }
}

impl RelationValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Self::Series(v) => Some(v),
            Self::Scalar(_) => None,
        }
    }

    /// In-place addition
    pub fn accumulate(&mut self, operand: &RelationValue) -> Result<()> {
        self.apply(operand, "add", |a, b| a + b)
    }

    /// In-place subtraction
    pub fn subtract(&mut self, operand: &RelationValue) -> Result<()> {
        self.apply(operand, "subtract", |a, b| a - b)
    }

    /// In-place multiplication
    pub fn scale(&mut self, operand: &RelationValue) -> Result<()> {
        self.apply(operand, "multiply", |a, b| a * b)
    }

    /// In-place division; a zero divisor leaves the value untouched
    pub fn divide(&mut self, operand: &RelationValue) -> Result<()> {
        let has_zero = match operand {
            Self::Scalar(b) => *b == 0.0,
            Self::Series(ys) => ys.iter().any(|y| *y == 0.0),
        };
        if has_zero {
            return Err(Error::DivisionByZero);
        }
        self.apply(operand, "divide", |a, b| a / b)
    }

    fn apply(&mut self, operand: &RelationValue, op: &str, f: impl Fn(f64, f64) -> f64) -> Result<()> {
        match (self, operand) {
            (Self::Scalar(a), Self::Scalar(b)) => {
                *a = f(*a, *b);
                Ok(())
            }
            (Self::Series(xs), Self::Scalar(b)) => {
                for x in xs.iter_mut() {
                    *x = f(*x, *b);
                }
                Ok(())
            }
            (Self::Series(xs), Self::Series(ys)) if xs.len() == ys.len() => {
                for (x, y) in xs.iter_mut().zip(ys) {
                    *x = f(*x, *y);
                }
                Ok(())
            }
            (Self::Series(xs), Self::Series(ys)) => Err(Error::TypeMismatch(format!(
                "cannot {} series of length {} with series of length {}",
                op,
                xs.len(),
                ys.len()
            ))),
            (Self::Scalar(_), Self::Series(_)) => Err(Error::TypeMismatch(format!(
                "cannot {} scalar with series",
                op
            ))),
        }
    }
}

/// A directed association between one hyperedge and one element
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Identity; `parent` is the owning hyperedge
    identity: IdentityRecord,

    value: RelationValue,

    /// Associated element (not owned)
    target: ElementKey,

    direction: Direction,
}

impl Relation {
    pub(crate) fn new(
        identity: IdentityRecord,
        value: RelationValue,
        target: ElementKey,
        direction: Direction,
    ) -> Self {
        Self {
            identity,
            value,
            target,
            direction,
        }
    }

    pub fn identity(&self) -> &IdentityRecord {
        &self.identity
    }

    pub fn guid(&self) -> &Guid {
        self.identity.guid()
    }

    pub fn suid(&self) -> &Suid {
        self.identity.suid()
    }

    pub fn label(&self) -> &str {
        self.identity.label()
    }

    pub fn serial(&self) -> u64 {
        self.identity.serial()
    }

    /// Hyperedge this relation belongs to
    pub fn edge(&self) -> Option<ElementKey> {
        self.identity.parent()
    }

    pub fn target(&self) -> ElementKey {
        self.target
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes the direction only; edge counters are not adjusted
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn value(&self) -> &RelationValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<RelationValue>) {
        self.value = value.into();
    }

    pub fn is_in(&self) -> bool {
        self.direction.is_in()
    }

    pub fn is_out(&self) -> bool {
        self.direction.is_out()
    }

    pub fn accumulate(&mut self, operand: impl Into<RelationValue>) -> Result<()> {
        self.value.accumulate(&operand.into())
    }

    pub fn subtract(&mut self, operand: impl Into<RelationValue>) -> Result<()> {
        self.value.subtract(&operand.into())
    }

    pub fn scale(&mut self, operand: impl Into<RelationValue>) -> Result<()> {
        self.value.scale(&operand.into())
    }

    pub fn divide(&mut self, operand: impl Into<RelationValue>) -> Result<()> {
        self.value.divide(&operand.into())
    }
}

/// Policy deriving relation labels, and through them relation GUIDs.
///
/// The label is hashed by the graph's identity provider, so two associations
/// with the same label collide. Implementations can fold in more context to
/// widen the key space.
pub trait RelationNaming: Send + Sync {
    fn relation_label(&self, edge: &Element, direction: Direction, target: &Element) -> String {
        format!("{}{}{}", edge.label(), direction.symbol(), target.label())
    }

    fn relation_name(&self, edge: &Element, direction: Direction, target: &Element) -> String {
        format!("{}{}{}", edge.name(), direction.symbol(), target.label())
    }
}

/// `edge.label + symbol + target.label`
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelNaming;

impl RelationNaming for LabelNaming {}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(direction: Direction, value: impl Into<RelationValue>) -> Relation {
        let guid = Guid::from_bytes(vec![9; 4]);
        let identity = IdentityRecord::new(0, 0, guid.clone(), guid, "E->V", Some(ElementKey(0)));
        Relation::new(identity, value.into(), ElementKey(1), direction)
    }

    #[test]
    fn test_direction_symbols() {
        assert_eq!(Direction::Undefined.to_string(), "--");
        assert_eq!(Direction::In.to_string(), "<-");
        assert_eq!(Direction::Out.to_string(), "->");
        assert_eq!("->".parse::<Direction>().unwrap(), Direction::Out);
        assert!(matches!(
            "=>".parse::<Direction>(),
            Err(Error::InvalidRelationDirection(_))
        ));
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(Direction::try_from(0).unwrap(), Direction::Undefined);
        assert_eq!(Direction::try_from(1).unwrap(), Direction::In);
        assert_eq!(Direction::try_from(2).unwrap(), Direction::Out);
        assert!(matches!(
            Direction::try_from(3),
            Err(Error::InvalidRelationDirection(_))
        ));
    }

    #[test]
    fn test_direction_membership() {
        let undirected = relation(Direction::Undefined, 1.0);
        assert!(undirected.is_in() && undirected.is_out());

        let inbound = relation(Direction::In, 1.0);
        assert!(inbound.is_in() && !inbound.is_out());

        let outbound = relation(Direction::Out, 1.0);
        assert!(!outbound.is_in() && outbound.is_out());
    }

    #[test]
    fn test_scalar_arithmetic() {
        let mut rel = relation(Direction::Out, 5.0);
        rel.accumulate(3.0).unwrap();
        rel.subtract(2.0).unwrap();
        rel.scale(4.0).unwrap();
        rel.divide(3.0).unwrap();
        assert_eq!(rel.value().as_scalar(), Some(8.0));
    }

    #[test]
    fn test_series_arithmetic() {
        let mut rel = relation(Direction::Out, vec![1.0, 2.0, 3.0]);
        rel.scale(2.0).unwrap();
        assert_eq!(rel.value().as_series(), Some(&[2.0, 4.0, 6.0][..]));

        rel.accumulate(vec![1.0, 1.0, 1.0]).unwrap();
        assert_eq!(rel.value().as_series(), Some(&[3.0, 5.0, 7.0][..]));
    }

    #[test]
    fn test_arithmetic_mismatch() {
        let mut rel = relation(Direction::Out, vec![1.0, 2.0]);
        assert!(matches!(
            rel.accumulate(vec![1.0]),
            Err(Error::TypeMismatch(_))
        ));

        let mut scalar = relation(Direction::Out, 1.0);
        assert!(matches!(
            scalar.scale(vec![1.0, 2.0]),
            Err(Error::TypeMismatch(_))
        ));
        assert_eq!(scalar.value().as_scalar(), Some(1.0));
    }

    #[test]
    fn test_divide_by_zero() {
        let mut rel = relation(Direction::Out, vec![4.0, 8.0]);
        assert_eq!(rel.divide(vec![2.0, 0.0]), Err(Error::DivisionByZero));
        assert_eq!(rel.value().as_series(), Some(&[4.0, 8.0][..]));
    }
}
