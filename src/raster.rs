// src/raster.rs
use std::collections::HashMap;
use std::fmt;

use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ChangeError, Result};

/// Spectral band identifiers understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Nir,
    Red,
    Swir,
    Green,
    Blue,
}

impl Band {
    pub const REQUIRED: [Band; 3] = [Band::Nir, Band::Red, Band::Swir];

    pub fn name(&self) -> &'static str {
        match self {
            Band::Nir => "nir",
            Band::Red => "red",
            Band::Swir => "swir",
            Band::Green => "green",
            Band::Blue => "blue",
        }
    }

    pub fn from_name(name: &str) -> Option<Band> {
        match name.to_ascii_lowercase().as_str() {
            "nir" => Some(Band::Nir),
            "red" => Some(Band::Red),
            "swir" => Some(Band::Swir),
            "green" => Some(Band::Green),
            "blue" => Some(Band::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Co-registered single-band rasters for one point in time.
///
/// Every band shares the same non-empty shape; constructors reject
/// anything else so pixel-wise code downstream never has to check.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSet {
    nir: Array2<f64>,
    red: Array2<f64>,
    swir: Array2<f64>,
    green: Option<Array2<f64>>,
    blue: Option<Array2<f64>>,
}

impl BandSet {
    pub fn new(nir: Array2<f64>, red: Array2<f64>, swir: Array2<f64>) -> Result<Self> {
        check_non_empty(Band::Nir, &nir)?;
        let shape = nir.dim();
        check_shape(Band::Red, &red, shape)?;
        check_shape(Band::Swir, &swir, shape)?;

        Ok(Self {
            nir,
            red,
            swir,
            green: None,
            blue: None,
        })
    }

    pub fn with_green(mut self, green: Array2<f64>) -> Result<Self> {
        check_shape(Band::Green, &green, self.shape())?;
        self.green = Some(green);
        Ok(self)
    }

    pub fn with_blue(mut self, blue: Array2<f64>) -> Result<Self> {
        check_shape(Band::Blue, &blue, self.shape())?;
        self.blue = Some(blue);
        Ok(self)
    }

    /// Build a band set from a name-keyed map, e.g. what a band fetcher returns.
    /// Unknown keys are ignored; a missing `nir`, `red` or `swir` is an error.
    pub fn from_map(mut bands: HashMap<String, Array2<f64>>) -> Result<Self> {
        let mut take = |band: Band| -> Option<Array2<f64>> {
            let key = bands
                .keys()
                .find(|k| Band::from_name(k) == Some(band))
                .cloned()?;
            bands.remove(&key)
        };

        let nir = take(Band::Nir).ok_or_else(|| missing(Band::Nir))?;
        let red = take(Band::Red).ok_or_else(|| missing(Band::Red))?;
        let swir = take(Band::Swir).ok_or_else(|| missing(Band::Swir))?;
        let green = take(Band::Green);
        let blue = take(Band::Blue);

        let mut set = BandSet::new(nir, red, swir)?;
        if let Some(green) = green {
            set = set.with_green(green)?;
        }
        if let Some(blue) = blue {
            set = set.with_blue(blue)?;
        }
        Ok(set)
    }

    /// (rows, cols) shared by every band
    pub fn shape(&self) -> (usize, usize) {
        self.nir.dim()
    }

    pub fn nir(&self) -> &Array2<f64> {
        &self.nir
    }

    pub fn red(&self) -> &Array2<f64> {
        &self.red
    }

    pub fn swir(&self) -> &Array2<f64> {
        &self.swir
    }

    pub fn green(&self) -> Option<&Array2<f64>> {
        self.green.as_ref()
    }

    pub fn blue(&self) -> Option<&Array2<f64>> {
        self.blue.as_ref()
    }

    pub fn band(&self, band: Band) -> Option<&Array2<f64>> {
        match band {
            Band::Nir => Some(&self.nir),
            Band::Red => Some(&self.red),
            Band::Swir => Some(&self.swir),
            Band::Green => self.green.as_ref(),
            Band::Blue => self.blue.as_ref(),
        }
    }

    pub fn require(&self, band: Band) -> Result<&Array2<f64>> {
        self.band(band).ok_or_else(|| missing(band))
    }

    /// Apply `f` to every band present, keeping the optional ones optional.
    pub fn map_bands<F>(&self, f: F) -> Result<BandSet>
    where
        F: Fn(&Array2<f64>) -> Array2<f64>,
    {
        let mut set = BandSet::new(f(&self.nir), f(&self.red), f(&self.swir))?;
        if let Some(green) = &self.green {
            set = set.with_green(f(green))?;
        }
        if let Some(blue) = &self.blue {
            set = set.with_blue(f(blue))?;
        }
        Ok(set)
    }
}

fn missing(band: Band) -> ChangeError {
    ChangeError::MissingBand {
        band: band.name().to_string(),
    }
}

fn check_non_empty(band: Band, data: &Array2<f64>) -> Result<()> {
    if data.is_empty() {
        return Err(ChangeError::EmptyRaster {
            band: band.name().to_string(),
        });
    }
    Ok(())
}

fn check_shape(band: Band, data: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    check_non_empty(band, data)?;
    if data.dim() != expected {
        return Err(ChangeError::ShapeMismatch {
            band: band.name().to_string(),
            expected,
            found: data.dim(),
        });
    }
    Ok(())
}

/// 8-bit color image, laid out as (rows, cols, channels).
///
/// Three channels are read as R, G, B. A single channel is treated as
/// grayscale and answers for all three.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    data: Array3<u8>,
}

impl ColorImage {
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let (rows, cols, channels) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(ChangeError::InvalidImage(format!(
                "image is empty ({}x{})",
                rows, cols
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(ChangeError::InvalidImage(format!(
                "expected 1 or 3 channels, found {}",
                channels
            )));
        }
        Ok(Self { data })
    }

    pub fn from_gray(gray: Array2<u8>) -> Result<Self> {
        Self::new(gray.insert_axis(Axis(2)))
    }

    pub fn shape(&self) -> (usize, usize) {
        let (rows, cols, _) = self.data.dim();
        (rows, cols)
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn is_gray(&self) -> bool {
        self.channels() == 1
    }

    pub fn red(&self) -> ArrayView2<'_, u8> {
        self.channel(0)
    }

    pub fn green(&self) -> ArrayView2<'_, u8> {
        self.channel(1)
    }

    pub fn blue(&self) -> ArrayView2<'_, u8> {
        self.channel(2)
    }

    fn channel(&self, index: usize) -> ArrayView2<'_, u8> {
        let index = if self.is_gray() { 0 } else { index };
        self.data.index_axis(Axis(2), index)
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }
}
