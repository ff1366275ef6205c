use serde::{Deserialize, Serialize};

macro_rules! newtype {
    ($name:ident, $inner:ty) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            Default,
        )]
        pub struct $name(pub $inner);
    };
}

newtype!(GameId, u32);
newtype!(ServiceTypeId, u32);
