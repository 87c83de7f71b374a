use serde::ser::{Serialize, SerializeStruct, Serializer};

/// One visible price level: a value snapshot with no identity beyond its
/// fields. Used both for inbound deltas and for the cached top of book.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub price: f64,
    pub size: f64,
}

impl Entry {
    /// Sentinel for an empty ask side: infinitely expensive, nothing resting.
    pub const NO_ASK: Entry = Entry {
        price: f64::INFINITY,
        size: 0.0,
    };

    /// Sentinel for an empty bid side.
    pub const NO_BID: Entry = Entry {
        price: 0.0,
        size: 0.0,
    };

    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

// The feed quotes prices and sizes as decimal strings, and the summary
// keeps that encoding on the way out.
impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Entry", 2)?;
        state.serialize_field("price", &self.price.to_string())?;
        state.serialize_field("size", &self.size.to_string())?;
        state.end()
    }
}
