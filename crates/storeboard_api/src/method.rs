use serde::Serialize;

/// A typed endpoint of the storefront backend. `PATH` is relative to the
/// client's base URL.
pub trait Method {
    const PATH: &'static str;

    type Response: serde::de::DeserializeOwned;
    type Params: Serialize;
}
