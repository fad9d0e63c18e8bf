// tests/unit_tests.rs
use approx::assert_abs_diff_eq;
use ndarray::{Array2, Array3};
use spectral_change::processing::indices::{
    compute_index, normalized_difference, DegeneratePolicy, IndexCalculator, IndexKind, NDI,
};
use spectral_change::processing::resample::resample_bilinear;
use spectral_change::processing::simulate_bands_from_color_image;
use spectral_change::{Band, BandSet, ChangeError, ColorImage};

/// Helper function to create a raster with a repeating value pattern
fn create_test_data(width: usize, height: usize, values: &[f64]) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(y, x)| values[(y * width + x) % values.len()])
}

/// Test NDVI calculation with known values
#[test]
fn test_ndvi_calculation() {
    let test_cases = [
        // NIR, RED, Expected NDVI
        (5000.0, 2500.0, 0.33333), // (5000-2500)/(5000+2500)
        (3000.0, 3000.0, 0.0),
        (1000.0, 500.0, 0.33333),
        (0.0, 0.0, 0.0), // zero denominator is zero-filled
    ];

    let nir_values: Vec<f64> = test_cases.iter().map(|(nir, _, _)| *nir).collect();
    let red_values: Vec<f64> = test_cases.iter().map(|(_, red, _)| *red).collect();
    let nir = create_test_data(2, 2, &nir_values);
    let red = create_test_data(2, 2, &red_values);

    let ndvi = compute_index(IndexKind::Ndvi, &nir, &red).unwrap();

    for (value, (_, _, expected)) in ndvi.iter().zip(test_cases.iter()) {
        assert_abs_diff_eq!(*value, *expected, epsilon = 1e-4);
    }
}

#[test]
fn test_constant_scene_ndvi() {
    let nir = Array2::from_elem((4, 4), 0.5);
    let red = Array2::from_elem((4, 4), 0.1);

    let ndvi = compute_index(IndexKind::Ndvi, &nir, &red).unwrap();

    assert_eq!(ndvi.dim(), (4, 4));
    for &value in ndvi.iter() {
        assert_abs_diff_eq!(value, 0.6667, epsilon = 1e-4);
    }
}

#[test]
fn test_zero_division_is_exactly_zero() {
    let zeros = Array2::<f64>::zeros((3, 3));
    for kind in IndexKind::ALL {
        let index = compute_index(kind, &zeros, &zeros).unwrap();
        assert!(index.iter().all(|&v| v == 0.0), "{} should be all zeros", kind);
    }
}

#[test]
fn test_index_range_and_finiteness() {
    // Mix of reflectance-like values, zeros and a pixel with opposite signs summing to zero
    let a = create_test_data(5, 4, &[0.0, 0.1, 0.35, 0.9, 255.0, 1e-12, -0.2, 0.0]);
    let b = create_test_data(5, 4, &[0.0, 0.4, 0.05, 0.0, 12.0, 0.0, 0.2, 0.7, 3.0]);

    for kind in IndexKind::ALL {
        let index = compute_index(kind, &a, &b).unwrap();
        assert!(index.iter().all(|v| v.is_finite()));
    }

    // Non-negative inputs stay within [-1, 1]
    let a = a.mapv(f64::abs);
    let index = compute_index(IndexKind::Ndvi, &a, &b).unwrap();
    assert!(index.iter().all(|&v| (-1.0..=1.0).contains(&v)));
}

#[test]
fn test_ndbi_is_negated_ndmi() {
    let nir = create_test_data(3, 3, &[0.4, 0.3, 0.0, 0.8]);
    let swir = create_test_data(3, 3, &[0.2, 0.3, 0.0, 0.1, 0.5]);

    let ndmi = compute_index(IndexKind::Ndmi, &nir, &swir).unwrap();
    let ndbi = compute_index(IndexKind::Ndbi, &swir, &nir).unwrap();

    for (m, b) in ndmi.iter().zip(ndbi.iter()) {
        assert_abs_diff_eq!(*m, -*b, epsilon = 1e-12);
    }
}

#[test]
fn test_compute_index_rejects_mismatched_shapes() {
    let a = Array2::<f64>::zeros((2, 2));
    let b = Array2::<f64>::zeros((3, 2));
    match compute_index(IndexKind::Ndvi, &a, &b) {
        Err(ChangeError::ShapeMismatch { band, .. }) => assert_eq!(band, "red"),
        other => panic!("expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_nodata_policy() {
    let a = create_test_data(2, 1, &[0.5, 0.0]);
    let b = create_test_data(2, 1, &[0.1, 0.0]);

    let filled = normalized_difference(&a, &b, DegeneratePolicy::NoData(-999.0));
    assert_abs_diff_eq!(filled[[0, 0]], 0.6667, epsilon = 1e-4);
    assert_eq!(filled[[0, 1]], -999.0);
}

#[test]
fn test_calculator_reads_its_bands() {
    let bands = BandSet::new(
        Array2::from_elem((2, 2), 0.6),
        Array2::from_elem((2, 2), 0.2),
        Array2::from_elem((2, 2), 0.3),
    )
    .unwrap();

    let ndmi = IndexKind::Ndmi.calculator();
    assert_eq!(ndmi.name(), "NDMI");
    assert_eq!(ndmi.required_bands(), vec![Band::Nir, Band::Swir]);

    let result = ndmi.calculate(&bands).unwrap();
    assert_abs_diff_eq!(result[[1, 1]], 0.3333, epsilon = 1e-4);
}

/// Test that custom names and missing bands are handled
#[test]
fn test_custom_calculator() {
    let gndvi = NDI::new(Band::Nir, Band::Green, Some("GNDVI".to_string()));
    assert_eq!(gndvi.name(), "GNDVI");

    let bands = BandSet::new(
        Array2::from_elem((1, 1), 0.6),
        Array2::from_elem((1, 1), 0.2),
        Array2::from_elem((1, 1), 0.3),
    )
    .unwrap();
    assert!(matches!(
        gndvi.calculate(&bands),
        Err(ChangeError::MissingBand { .. })
    ));
}

#[test]
fn test_band_set_validation() {
    let ok = Array2::<f64>::zeros((2, 2));
    let wrong = Array2::<f64>::zeros((2, 3));
    let empty = Array2::<f64>::zeros((0, 0));

    assert!(matches!(
        BandSet::new(ok.clone(), wrong.clone(), ok.clone()),
        Err(ChangeError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        BandSet::new(empty, ok.clone(), ok.clone()),
        Err(ChangeError::EmptyRaster { .. })
    ));

    let set = BandSet::new(ok.clone(), ok.clone(), ok.clone()).unwrap();
    assert!(set.with_green(wrong).is_err());
}

#[test]
fn test_band_set_from_map() {
    let mut bands = std::collections::HashMap::new();
    bands.insert("NIR".to_string(), Array2::from_elem((2, 2), 0.5));
    bands.insert("red".to_string(), Array2::from_elem((2, 2), 0.1));

    match BandSet::from_map(bands.clone()) {
        Err(ChangeError::MissingBand { band }) => assert_eq!(band, "swir"),
        other => panic!("expected missing swir, got {:?}", other),
    }

    bands.insert("swir".to_string(), Array2::from_elem((2, 2), 0.2));
    bands.insert("blue".to_string(), Array2::from_elem((2, 2), 0.05));
    let set = BandSet::from_map(bands).unwrap();
    assert_eq!(set.shape(), (2, 2));
    assert!(set.blue().is_some());
    assert!(set.green().is_none());
}

#[test]
fn test_resample_preserves_constant_and_corners() {
    let constant = Array2::from_elem((3, 5), 0.42);
    let resized = resample_bilinear(&constant, (6, 4));
    assert_eq!(resized.dim(), (6, 4));
    assert!(resized.iter().all(|&v| (v - 0.42).abs() < 1e-12));

    // Upsampling 2x2 -> 4x4: interior blends, corners are clamped to the source
    let src = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    let up = resample_bilinear(&src, (4, 4));
    assert_abs_diff_eq!(up[[0, 0]], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(up[[3, 3]], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(up[[1, 1]], 0.75, epsilon = 1e-12);
}

#[test]
fn test_simulated_bands() {
    // One pixel: R=100, G=200, B=50
    let image = ColorImage::new(Array3::from_shape_vec((1, 1, 3), vec![100, 200, 50]).unwrap()).unwrap();
    let bands = simulate_bands_from_color_image(&image).unwrap();

    // 1.2 * 200 + 20 = 260 -> clipped to 255
    assert_eq!(bands.nir()[[0, 0]], 255.0);
    // 0.8 * 100 + 0.3 * 50 = 95
    assert_eq!(bands.swir()[[0, 0]], 95.0);
    assert_eq!(bands.red()[[0, 0]], 100.0);
    assert_eq!(bands.green().map(|g| g[[0, 0]]), Some(200.0));
    assert_eq!(bands.blue().map(|b| b[[0, 0]]), Some(50.0));
}

#[test]
fn test_simulated_bands_truncate_to_8_bit() {
    // G=11: 1.2 * 11 + 20 = 33.2 -> 33; R=7, B=3: 5.6 + 0.9 = 6.5 -> 6
    let image = ColorImage::new(Array3::from_shape_vec((1, 1, 3), vec![7, 11, 3]).unwrap()).unwrap();
    let bands = simulate_bands_from_color_image(&image).unwrap();
    assert_eq!(bands.nir()[[0, 0]], 33.0);
    assert_eq!(bands.swir()[[0, 0]], 6.0);
}

#[test]
fn test_grayscale_image_simulation() {
    let gray = ColorImage::from_gray(Array2::from_elem((2, 2), 10u8)).unwrap();
    assert!(gray.is_gray());
    let bands = simulate_bands_from_color_image(&gray).unwrap();
    // 1.2 * 10 + 20 = 32; 0.8 * 10 + 0.3 * 10 = 11
    assert_eq!(bands.nir()[[1, 1]], 32.0);
    assert_eq!(bands.swir()[[1, 1]], 11.0);
    assert_eq!(bands.red()[[1, 1]], 10.0);
}

#[test]
fn test_color_image_validation() {
    assert!(ColorImage::new(Array3::<u8>::zeros((2, 2, 2))).is_err());
    assert!(ColorImage::new(Array3::<u8>::zeros((0, 2, 3))).is_err());
}
