//! Image understanding for lineqr: raster decoding and QR symbol reading.

pub mod qr;
pub mod raster;

pub use qr::{
    DetectedSymbol, QR_FALLBACK_TEXT, QR_REPLY_PREFIX, QrDecodeError, QrReader, RqrrScanner,
    SymbolScanner, order_symbols, reply_for,
};
pub use raster::decode_raster;
