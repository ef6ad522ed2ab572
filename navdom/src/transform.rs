/// 2D affine matrix in CSS order:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        }
    }

    pub fn scaling(x: f64, y: f64) -> Self {
        Self {
            a: x,
            d: y,
            ..Self::IDENTITY
        }
    }

    /// `self × other`, i.e. `other` is applied first.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Parse a CSS `transform` value.
    ///
    /// `reference` is the element's `(width, height)`, used to resolve
    /// percentages in translations. Returns `None` for functions outside the
    /// supported set (`matrix`, `matrix3d`, `translate*`, `scale*`) or for
    /// malformed input.
    pub fn parse(value: &str, reference: (f64, f64)) -> Option<Matrix> {
        let value = value.trim();
        if value.is_empty() || value == "none" {
            return Some(Matrix::IDENTITY);
        }

        let mut result = Matrix::IDENTITY;
        let mut rest = value;
        while !rest.is_empty() {
            let open = rest.find('(')?;
            let close = rest[open..].find(')')? + open;
            let name = rest[..open].trim();
            let args: Vec<&str> = rest[open + 1..close]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();

            let step = parse_function(name, &args, reference)?;
            result = result.multiply(&step);
            rest = rest[close + 1..].trim_start();
        }

        Some(result)
    }
}

fn parse_function(name: &str, args: &[&str], (width, height): (f64, f64)) -> Option<Matrix> {
    let number = |i: usize| -> Option<f64> { args.get(i)?.parse::<f64>().ok() };
    let length = |i: usize, reference: f64| -> Option<f64> { parse_length(args.get(i)?, reference) };

    match name.to_ascii_lowercase().as_str() {
        "matrix" if args.len() == 6 => Some(Matrix {
            a: number(0)?,
            b: number(1)?,
            c: number(2)?,
            d: number(3)?,
            e: number(4)?,
            f: number(5)?,
        }),
        "matrix3d" if args.len() == 16 => Some(Matrix {
            a: number(0)?,
            b: number(1)?,
            c: number(4)?,
            d: number(5)?,
            e: number(12)?,
            f: number(13)?,
        }),
        "translate" if !args.is_empty() && args.len() <= 2 => {
            let y = if args.len() == 2 { length(1, height)? } else { 0.0 };
            Some(Matrix::translation(length(0, width)?, y))
        }
        "translatex" if args.len() == 1 => Some(Matrix::translation(length(0, width)?, 0.0)),
        "translatey" if args.len() == 1 => Some(Matrix::translation(0.0, length(0, height)?)),
        "translate3d" if args.len() == 3 => {
            Some(Matrix::translation(length(0, width)?, length(1, height)?))
        }
        "scale" if !args.is_empty() && args.len() <= 2 => {
            let x = number(0)?;
            let y = if args.len() == 2 { number(1)? } else { x };
            Some(Matrix::scaling(x, y))
        }
        "scalex" if args.len() == 1 => Some(Matrix::scaling(number(0)?, 1.0)),
        "scaley" if args.len() == 1 => Some(Matrix::scaling(1.0, number(0)?)),
        _ => None,
    }
}

fn parse_length(raw: &str, reference: f64) -> Option<f64> {
    let raw = raw.trim();
    if let Some(px) = raw.strip_suffix("px") {
        return px.trim().parse().ok();
    }
    if let Some(pct) = raw.strip_suffix('%') {
        return pct.trim().parse::<f64>().ok().map(|p| p / 100.0 * reference);
    }
    // Unitless lengths are only valid for zero in CSS, browsers still accept them.
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        assert_eq!(Matrix::parse("none", (0.0, 0.0)), Some(Matrix::IDENTITY));
        assert_eq!(Matrix::parse("", (0.0, 0.0)), Some(Matrix::IDENTITY));
    }

    #[test]
    fn composed_functions_multiply() {
        let m = Matrix::parse("translateX(10px) scale(2)", (0.0, 0.0)).unwrap();
        assert_eq!(m.a, 2.0);
        assert_eq!(m.e, 10.0);

        // scale applies after translate when written first
        let m = Matrix::parse("scale(2) translateX(10px)", (0.0, 0.0)).unwrap();
        assert_eq!(m.e, 20.0);
    }

    #[test]
    fn unsupported_function_is_none() {
        assert_eq!(Matrix::parse("rotate(45deg)", (0.0, 0.0)), None);
        assert_eq!(Matrix::parse("matrix(1, 0, 0)", (0.0, 0.0)), None);
        assert_eq!(Matrix::parse("translateX(10px", (0.0, 0.0)), None);
    }
}
