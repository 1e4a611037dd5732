// Candle sources and storage. None of this is needed to run an analysis;
// it is how the binary and the service get candles in the first place.
pub mod bitget;
pub mod csv_parser;
pub mod market_data;
