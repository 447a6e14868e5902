use std::fmt;

/// One color channel of a tile. Raster band indices are 0-based in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Red,
    Green,
    Blue,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Red, Band::Green, Band::Blue];

    pub fn index(self) -> usize {
        match self {
            Band::Red => 0,
            Band::Green => 1,
            Band::Blue => 2,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Band::Red => "red",
            Band::Green => "green",
            Band::Blue => "blue",
        };
        f.pad(name)
    }
}
