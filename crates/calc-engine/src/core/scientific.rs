//! Unary scientific functions and constant keys.
//!
//! Trigonometric arguments are degrees.

use crate::core::DomainError;

/// Largest factorial argument whose result is still finite
pub const MAX_FACTORIAL: u32 = 170;

/// `|cos(x)|` below this makes `tan(x)` undefined
const TAN_POLE_EPSILON: f64 = 1e-10;

/// Unary functions on the scientific keypad row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScientificFn {
    /// Square root
    Sqrt,
    /// x²
    Square,
    /// x³
    Cube,
    /// 1/x
    Inverse,
    /// Sine (degrees)
    Sin,
    /// Cosine (degrees)
    Cos,
    /// Tangent (degrees)
    Tan,
    /// Common logarithm
    Log10,
    /// Natural logarithm
    Ln,
    /// n!
    Factorial,
    /// Absolute value
    Abs,
}

impl ScientificFn {
    /// All functions in keypad order
    pub const ALL: [ScientificFn; 11] = [
        Self::Sqrt,
        Self::Square,
        Self::Cube,
        Self::Inverse,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Log10,
        Self::Ln,
        Self::Factorial,
        Self::Abs,
    ];

    /// Applies the function, rejecting arguments outside its domain
    pub fn apply(&self, x: f64) -> Result<f64, DomainError> {
        match self {
            Self::Sqrt if x < 0.0 => Err(DomainError::NegativeSqrt),
            Self::Sqrt => Ok(x.sqrt()),
            Self::Square => Ok(x * x),
            Self::Cube => Ok(x * x * x),
            Self::Inverse if x == 0.0 => Err(DomainError::InverseOfZero),
            Self::Inverse => Ok(1.0 / x),
            Self::Sin => Ok(degrees_to_radians(x).sin()),
            Self::Cos => Ok(degrees_to_radians(x).cos()),
            Self::Tan => {
                let rad = degrees_to_radians(x);
                if rad.cos().abs() < TAN_POLE_EPSILON {
                    Err(DomainError::TanUndefined)
                } else {
                    Ok(rad.tan())
                }
            }
            Self::Log10 if x <= 0.0 => Err(DomainError::LogNonPositive),
            Self::Log10 => Ok(x.log10()),
            Self::Ln if x <= 0.0 => Err(DomainError::LnNonPositive),
            Self::Ln => Ok(x.ln()),
            Self::Factorial => factorial(x),
            Self::Abs => Ok(x.abs()),
        }
    }

    /// Renders the function applied to `operand` for the expression trace
    #[must_use]
    pub fn notation(&self, operand: &str) -> String {
        match self {
            Self::Sqrt => format!("√({operand})"),
            Self::Square => format!("({operand})²"),
            Self::Cube => format!("({operand})³"),
            Self::Inverse => format!("1/({operand})"),
            Self::Sin => format!("sin({operand}°)"),
            Self::Cos => format!("cos({operand}°)"),
            Self::Tan => format!("tan({operand}°)"),
            Self::Log10 => format!("log({operand})"),
            Self::Ln => format!("ln({operand})"),
            Self::Factorial => format!("{operand}!"),
            Self::Abs => format!("|{operand}|"),
        }
    }
}

/// `x * π / 180`; the multiplication comes first so `sin(180°)` lands on
/// `1.2246467991473532e-16`.
fn degrees_to_radians(x: f64) -> f64 {
    x * std::f64::consts::PI / 180.0
}

fn factorial(x: f64) -> Result<f64, DomainError> {
    if x.fract() != 0.0 || x < 0.0 || x > f64::from(MAX_FACTORIAL) {
        return Err(DomainError::FactorialRange);
    }
    let n = x as u32;
    Ok((2..=n).fold(1.0, |acc, i| acc * f64::from(i)))
}

/// Constant keys that replace the current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
    /// Uniform random value in [0, 1)
    Random,
}

impl Constant {
    /// Trace notation for the constant
    #[must_use]
    pub const fn notation(&self) -> &'static str {
        match self {
            Self::Pi => "π",
            Self::E => "e",
            Self::Random => "rand()",
        }
    }

    /// Fixed value of the constant, `None` for [`Constant::Random`]
    #[must_use]
    pub const fn fixed_value(&self) -> Option<f64> {
        match self {
            Self::Pi => Some(std::f64::consts::PI),
            Self::E => Some(std::f64::consts::E),
            Self::Random => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(ScientificFn::Sqrt.apply(16.0), Ok(4.0));
        assert_eq!(ScientificFn::Sqrt.apply(0.0), Ok(0.0));
        assert_eq!(
            ScientificFn::Sqrt.apply(-1.0),
            Err(DomainError::NegativeSqrt)
        );
    }

    #[test]
    fn test_powers() {
        assert_eq!(ScientificFn::Square.apply(-3.0), Ok(9.0));
        assert_eq!(ScientificFn::Cube.apply(-2.0), Ok(-8.0));
    }

    #[test]
    fn test_inverse() {
        assert_eq!(ScientificFn::Inverse.apply(4.0), Ok(0.25));
        assert_eq!(
            ScientificFn::Inverse.apply(0.0),
            Err(DomainError::InverseOfZero)
        );
    }

    #[test]
    fn test_trig_in_degrees() {
        assert!(close(ScientificFn::Sin.apply(30.0).unwrap(), 0.5));
        assert!(close(ScientificFn::Cos.apply(60.0).unwrap(), 0.5));
        assert!(close(ScientificFn::Tan.apply(45.0).unwrap(), 1.0));
    }

    #[test]
    fn test_tan_poles_are_rejected() {
        for angle in [90.0, 270.0, -90.0, 450.0] {
            assert_eq!(
                ScientificFn::Tan.apply(angle),
                Err(DomainError::TanUndefined),
                "tan({angle}°)"
            );
        }
    }

    #[test]
    fn test_logs() {
        assert_eq!(ScientificFn::Log10.apply(1000.0), Ok(3.0));
        assert_eq!(ScientificFn::Ln.apply(1.0), Ok(0.0));
        assert_eq!(
            ScientificFn::Log10.apply(0.0),
            Err(DomainError::LogNonPositive)
        );
        assert_eq!(
            ScientificFn::Ln.apply(-5.0),
            Err(DomainError::LnNonPositive)
        );
    }

    #[test]
    fn test_factorial() {
        assert_eq!(ScientificFn::Factorial.apply(0.0), Ok(1.0));
        assert_eq!(ScientificFn::Factorial.apply(5.0), Ok(120.0));
        assert!(ScientificFn::Factorial.apply(170.0).unwrap().is_finite());
    }

    #[test]
    fn test_factorial_domain() {
        for x in [-1.0, 2.5, 171.0] {
            assert_eq!(
                ScientificFn::Factorial.apply(x),
                Err(DomainError::FactorialRange)
            );
        }
    }

    #[test]
    fn test_abs() {
        assert_eq!(ScientificFn::Abs.apply(-7.5), Ok(7.5));
    }

    #[test]
    fn test_notation() {
        assert_eq!(ScientificFn::Sqrt.notation("16"), "√(16)");
        assert_eq!(ScientificFn::Square.notation("3"), "(3)²");
        assert_eq!(ScientificFn::Cube.notation("3"), "(3)³");
        assert_eq!(ScientificFn::Inverse.notation("4"), "1/(4)");
        assert_eq!(ScientificFn::Sin.notation("30"), "sin(30°)");
        assert_eq!(ScientificFn::Cos.notation("30"), "cos(30°)");
        assert_eq!(ScientificFn::Tan.notation("30"), "tan(30°)");
        assert_eq!(ScientificFn::Log10.notation("100"), "log(100)");
        assert_eq!(ScientificFn::Ln.notation("2"), "ln(2)");
        assert_eq!(ScientificFn::Factorial.notation("5"), "5!");
        assert_eq!(ScientificFn::Abs.notation("-2"), "|-2|");
    }

    #[test]
    fn test_constants() {
        assert_eq!(Constant::Pi.notation(), "π");
        assert_eq!(Constant::E.notation(), "e");
        assert_eq!(Constant::Random.notation(), "rand()");
        assert_eq!(Constant::Pi.fixed_value(), Some(std::f64::consts::PI));
        assert_eq!(Constant::Random.fixed_value(), None);
    }
}
