/// Encoder adapters for the supported SPDX serializations
mod json_encoder;
mod rdf_encoder;
mod spdx_fields;
mod tag_value_encoder;

pub use json_encoder::{JsonDecoder, JsonEncoder};
pub use rdf_encoder::RdfEncoder;
pub use tag_value_encoder::{TagValueDecoder, TagValueEncoder};

#[cfg(test)]
mod test_fixtures;
