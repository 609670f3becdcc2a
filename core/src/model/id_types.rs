use serde::{
    de::{self, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::fmt::Display;

macro_rules! impl_id {
    ($ident:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Hash, Serialize)]
        pub struct $ident(pub i64);

        impl<'de> Deserialize<'de> for $ident {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_i64(IdVisitor).map($ident)
            }
        }

        impl From<i64> for $ident {
            fn from(value: i64) -> Self {
                $ident(value)
            }
        }

        impl Display for $ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_fmt(format_args!(concat!(stringify!($ident), "({})"), self.0))
            }
        }
    };
}

/// Accepts integral ids as they are. Browser data may carry fractional ids
/// (`Date.now() + Math.random()`); those are scaled by [`TIEBREAKER_RANGE`]
/// and rounded, which keeps their millisecond part and lines them up with
/// [`AssetId::generate`]. Every reference to the same id maps the same way.
struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a numeric id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        let id = if v.fract() == 0.0 {
            v
        } else {
            (v * TIEBREAKER_RANGE as f64).round()
        };
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if id.is_finite() && id.abs() < i64::MAX as f64 {
            Ok(id as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

impl_id!(AssetId);
impl_id!(AlbumId);
impl_id!(ContextId);

/// Multiplier applied to the millisecond timestamp so a random tiebreaker
/// fits below it. The result stays below 2^53 so ids survive a round trip
/// through JSON readers that store numbers as doubles.
const TIEBREAKER_RANGE: i64 = 1000;

impl AssetId {
    /// Time based id with a random tiebreaker for ids created in the same millisecond.
    pub fn generate() -> AssetId {
        let millis = chrono::Utc::now().timestamp_millis();
        let tiebreaker = rand::random::<u16>() as i64 % TIEBREAKER_RANGE;
        AssetId(millis * TIEBREAKER_RANGE + tiebreaker)
    }
}

impl AlbumId {
    pub fn generate() -> AlbumId {
        AlbumId(chrono::Utc::now().timestamp_millis())
    }
}

impl ContextId {
    /// Ids are unique within the process.
    pub fn next() -> ContextId {
        use std::sync::atomic::{AtomicI64, Ordering};
        static NEXT: AtomicI64 = AtomicI64::new(1);
        ContextId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
