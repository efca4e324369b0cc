use phasecorr::{
    transform, Complex64, Grid, PhaseCorrError, Representation, SpectralTransform, TransformMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

fn random_complex(rng: &mut StdRng, shape: &[usize]) -> Grid<Complex64> {
    let len = shape.iter().product();
    let data = (0..len)
        .map(|_| Complex64::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)))
        .collect();
    Grid::from_shape_vec(shape, data).unwrap()
}

#[test]
fn forward_then_inverse_reconstructs_input() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut engine = SpectralTransform::new();
    for shape in [[6usize, 8], [5, 7], [1, 9], [4, 3]] {
        let x = random_complex(&mut rng, &shape);
        let forward = engine
            .transform(&x, TransformMode::FORWARD, false)
            .unwrap()
            .into_complex()
            .unwrap();
        let back = engine
            .transform(&forward, TransformMode::INVERSE, false)
            .unwrap()
            .into_complex()
            .unwrap();
        assert_eq!(back.shape(), x.shape());
        for (a, b) in back.as_slice().iter().zip(x.as_slice()) {
            assert!((a - b).norm() < 1e-9, "{a} vs {b} for shape {shape:?}");
        }
    }
}

#[test]
fn one_dimensional_round_trip() {
    let mut rng = StdRng::seed_from_u64(3);
    let x = random_complex(&mut rng, &[11]);
    let forward = transform(&x, TransformMode::FORWARD, false).unwrap();
    let back = transform(forward.as_complex().unwrap(), TransformMode::INVERSE, false)
        .unwrap()
        .into_complex()
        .unwrap();
    for (a, b) in back.as_slice().iter().zip(x.as_slice()) {
        assert!((a - b).norm() < 1e-9);
    }
}

#[test]
fn magnitude_and_phase_agree_with_complex_output() {
    let mut rng = StdRng::seed_from_u64(99);
    let data: Vec<f32> = (0..35).map(|_| rng.random_range(0.0..255.0)).collect();
    let x = Grid::from_vec2(data, 5, 7).unwrap();

    for direction_mode in [TransformMode::FORWARD, TransformMode::INVERSE] {
        let complex = transform(&x, direction_mode, false)
            .unwrap()
            .into_complex()
            .unwrap();
        let magnitude_mode =
            TransformMode::new(direction_mode.direction, Representation::Magnitude);
        let phase_mode = TransformMode::new(direction_mode.direction, Representation::Phase);
        let magnitude = transform(&x, magnitude_mode, false)
            .unwrap()
            .into_real()
            .unwrap();
        let phase = transform(&x, phase_mode, false).unwrap().into_real().unwrap();

        for ((z, m), p) in complex
            .as_slice()
            .iter()
            .zip(magnitude.as_slice())
            .zip(phase.as_slice())
        {
            let expected = z.re * z.re + z.im * z.im;
            assert!((m * m - expected).abs() <= 1e-9 * expected.max(1.0));
            assert!(*p > -PI && *p <= PI);
            if z.norm() > 1e-9 {
                let rebuilt = Complex64::from_polar(*m, *p);
                assert!((rebuilt - z).norm() < 1e-6 * z.norm().max(1.0));
            }
        }
    }
}

#[test]
fn real_and_imag_parts_match_complex_output() {
    let x = Grid::from_rows(&[vec![1i32, 5, -2], vec![0, 3, 8]]).unwrap();
    let complex = transform(&x, TransformMode::FORWARD, true)
        .unwrap()
        .into_complex()
        .unwrap();
    let re = transform(&x, TransformMode::forward(Representation::Real), true)
        .unwrap()
        .into_real()
        .unwrap();
    let im = transform(&x, TransformMode::forward(Representation::Imag), true)
        .unwrap()
        .into_real()
        .unwrap();
    for ((z, r), i) in complex.as_slice().iter().zip(re.as_slice()).zip(im.as_slice()) {
        assert_eq!(z.re, *r);
        assert_eq!(z.im, *i);
    }
}

#[test]
fn legacy_mode_codes_select_the_same_transform() {
    let x = Grid::from_rows(&[vec![0u8, 10, 20, 30], vec![40, 50, 60, 70]]).unwrap();
    let by_code = transform(&x, TransformMode::try_from(-2).unwrap(), false).unwrap();
    let by_name = transform(&x, "ifft2_module".parse().unwrap(), false).unwrap();
    let by_enum = transform(&x, TransformMode::inverse(Representation::Magnitude), false).unwrap();
    assert_eq!(by_code, by_enum);
    assert_eq!(by_name, by_enum);
}

#[test]
fn rank_three_input_is_rejected() {
    let cube = Grid::from_shape_vec(&[2, 3, 4], vec![1.0f64; 24]).unwrap();
    let err = transform(&cube, TransformMode::FORWARD, false).unwrap_err();
    assert_eq!(
        err,
        PhaseCorrError::UnsupportedRank {
            rank: 3,
            supported: "1 or 2",
            context: "spectral transform",
        }
    );
}
