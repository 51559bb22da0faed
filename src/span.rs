use std::ops;

/// Wraps a value with the start and end `Location`'s of the region of
/// the source it was produced from.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Span<T> {
    start: Location,
    end: Location,
    value: T,
}

impl<T> Span<T> {
    /// Create a new `Span` for a given start and end `Location` and value.
    pub fn new(start: Location, end: Location, value: T) -> Span<T> {
        Span { start, end, value }
    }

    /// Gets the start `Location` of the `Span`.
    pub fn start(&self) -> Location {
        self.start
    }

    /// Gets the end `Location` of the `Span`.
    pub fn end(&self) -> Location {
        self.end
    }

    /// Gets a reference to the value of the `Span`.
    pub fn value_ref(&self) -> &T {
        &self.value
    }

    /// Consumes the `Span` and returns its value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Maps the value of the `Span` while keeping its `Location`'s.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Span<U> {
        Span {
            start: self.start,
            end: self.end,
            value: f(self.value),
        }
    }
}

/// An abstract location within a stream of tokens or characters.
///
/// Note that `Location`'s are not orderable (that is, `Location` does not impl `Ord` or `PartialOrd`).
/// The value of a `Location` cannot tell you whether it comes before or after some other
/// `Location` in the same stream, just whether its equal or not equal to some other `Location`.
/// It is possible to create a new `Location` from a `usize` or by adding a `usize` to an exising `Location`.
///
/// # Panics
///
/// Adding a usize to a `Location` will panic if the resulting `Location` value is greater than
/// `usize::max_value()`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct Location(usize);

impl Location {
    /// Create a new `Location` for a given starting point.
    pub fn new(location: usize) -> Location {
        Location(location)
    }
}

impl ops::AddAssign<usize> for Location {
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs;
    }
}

impl ops::Add<usize> for Location {
    type Output = Location;

    fn add(mut self, rhs: usize) -> Location {
        self += rhs;
        self
    }
}

impl From<usize> for Location {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn location_default_eq_location_0() {
        let sut: Location = Default::default();

        assert_eq!(sut, Location::new(0));
    }

    #[test]
    fn location_add_eq_usize_add() {
        let base = 5;
        let inc = 3;

        let sut = Location::new(base);

        assert_eq!(sut + inc, Location::new(base + inc));
    }

    #[test]
    fn span_into_inner_gives_back_the_value() {
        let sut = Span::new(0.into(), 2.into(), "ab");

        assert_eq!(sut.into_inner(), "ab");
    }

    #[test]
    fn span_map_keeps_the_locations() {
        let sut = Span::new(3.into(), 5.into(), 12);

        let result = sut.map(|v| v * 2);

        assert_eq!(result, Span::new(3.into(), 5.into(), 24));
    }
}
