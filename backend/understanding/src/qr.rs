//! QR Code Reader
//!
//! Scans a raster for QR symbols and turns the result into the text the bot
//! replies with. Scanning sits behind [`SymbolScanner`] so tests can inject
//! canned symbols; [`RqrrScanner`] is the production implementation.
//!
//! Decoding is CPU-bound and synchronous; async callers should run it on a
//! blocking thread.

use std::panic::{self, AssertUnwindSafe};
use std::string::FromUtf8Error;
use std::sync::Arc;

use image::GrayImage;
use thiserror::Error;
use tracing::{debug, warn};

use crate::raster::decode_raster;

/// Prefix of a successful decode reply.
pub const QR_REPLY_PREFIX: &str = "QR Code Data: ";

/// Reply when no readable QR symbol was found.
pub const QR_FALLBACK_TEXT: &str =
    "Unable to decode the QR code. Please try again with a clearer image.";

/// One decoded symbol with its corner points in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSymbol {
    pub payload: Vec<u8>,
    pub bounds: [(i32, i32); 4],
}

impl DetectedSymbol {
    /// Smallest (y, x) over the corners; used for reading-order sorting.
    fn origin(&self) -> (i32, i32) {
        let y = self.bounds.iter().map(|p| p.1).min().unwrap_or(0);
        let x = self.bounds.iter().map(|p| p.0).min().unwrap_or(0);
        (y, x)
    }
}

/// Finds and decodes QR symbols in a greyscale raster.
pub trait SymbolScanner: Send + Sync {
    /// All symbols that could be decoded, in scanner order.
    fn scan(&self, image: &GrayImage) -> Vec<DetectedSymbol>;
}

/// Scanner backed by `rqrr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrScanner;

impl SymbolScanner for RqrrScanner {
    fn scan(&self, image: &GrayImage) -> Vec<DetectedSymbol> {
        let (width, height) = image.dimensions();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                image.get_pixel(x as u32, y as u32).0[0]
            });

        prepared
            .detect_grids()
            .into_iter()
            .filter_map(|grid| {
                let mut payload = Vec::new();
                match grid.decode_to(&mut payload) {
                    Ok(_) => Some(DetectedSymbol {
                        payload,
                        bounds: grid.bounds.map(|p| (p.x, p.y)),
                    }),
                    Err(e) => {
                        debug!(error = %e, "Detected QR grid could not be decoded");
                        None
                    }
                }
            })
            .collect()
    }
}

/// Sort symbols top-most first, then left-most. Ties keep scanner order.
pub fn order_symbols(symbols: &mut [DetectedSymbol]) {
    symbols.sort_by_key(DetectedSymbol::origin);
}

#[derive(Debug, Error)]
pub enum QrDecodeError {
    #[error("content is not a decodable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("no QR symbol found")]
    NoSymbol,

    #[error("QR payload is not valid UTF-8: {0}")]
    NotUtf8(#[from] FromUtf8Error),

    #[error("QR scanner aborted on a damaged symbol")]
    ScannerAborted,
}

/// Reply text for a decode outcome: the payload, or the fallback message.
pub fn reply_for(outcome: &Result<String, QrDecodeError>) -> String {
    match outcome {
        Ok(payload) => format!("{QR_REPLY_PREFIX}{payload}"),
        Err(_) => QR_FALLBACK_TEXT.to_string(),
    }
}

/// Reads QR payloads out of image bytes.
#[derive(Clone)]
pub struct QrReader {
    scanner: Arc<dyn SymbolScanner>,
}

impl Default for QrReader {
    fn default() -> Self {
        Self::new(Arc::new(RqrrScanner))
    }
}

impl QrReader {
    pub fn new(scanner: Arc<dyn SymbolScanner>) -> Self {
        Self { scanner }
    }

    /// Payload of the first symbol in reading order.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, QrDecodeError> {
        let raster = decode_raster(bytes)?;
        self.decode_raster(&raster)
    }

    /// A panic inside the scanner is reported as [`QrDecodeError::ScannerAborted`];
    /// `rqrr` asserts on some damaged grids.
    pub fn decode_raster(&self, raster: &GrayImage) -> Result<String, QrDecodeError> {
        let mut symbols = panic::catch_unwind(AssertUnwindSafe(|| self.scanner.scan(raster)))
            .map_err(|_| {
                warn!("QR scanner panicked; treating image as unreadable");
                QrDecodeError::ScannerAborted
            })?;
        debug!(found = symbols.len(), "QR scan finished");
        order_symbols(&mut symbols);

        let first = symbols.into_iter().next().ok_or(QrDecodeError::NoSymbol)?;
        Ok(String::from_utf8(first.payload)?)
    }
}
