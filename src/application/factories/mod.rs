mod encoder_factory;

pub use encoder_factory::EncoderFactory;
