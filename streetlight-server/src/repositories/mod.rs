mod streetlight;

pub use streetlight::StreetlightRepository;
