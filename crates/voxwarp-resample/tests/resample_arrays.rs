use approx::assert_relative_eq;
use ndarray::{Array4, ArrayD, IxDyn};
use rand::Rng;

use voxwarp_image::{SpatialImage, VoxelGrid};
use voxwarp_interp::{ExtendMode, InterpError};
use voxwarp_resample::{resample, ResampleError, ResampleOptions};
use voxwarp_transforms::{
    AffineSeries, AffineTransform, BSplineFieldTransform, DenseFieldTransform,
};

const EYE: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn random_volume(shape: &[usize]) -> ArrayD<f64> {
    let mut rng = rand::rng();
    ArrayD::from_shape_fn(IxDyn(shape), |_| rng.random_range(-100.0..100.0))
}

#[test]
fn identity_round_trip_reproduces_the_source() -> Result<(), ResampleError> {
    let data = random_volume(&[4, 5, 3]);
    // voxel sizes are powers of two so the inverse affine is exact
    let affine = [
        [2.0, 0.0, 0.0, -10.0],
        [0.0, 4.0, 0.0, 5.0],
        [0.0, 0.0, 0.5, 0.25],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let image = SpatialImage::new(data.clone(), affine, None)?;
    for order in 1..=5 {
        let options = ResampleOptions {
            order,
            ..Default::default()
        };
        let out = resample(
            &AffineTransform::identity(),
            &image,
            Some(image.grid()),
            &options,
        )?;
        assert_eq!(out.shape(), data.shape());
        for (v, w) in out.iter().zip(data.iter()) {
            assert_relative_eq!(*v, *w, epsilon = 1e-8);
        }
    }
    Ok(())
}

#[test]
fn nearest_neighbour_shifts_whole_voxels() -> Result<(), ResampleError> {
    let mut data = ArrayD::zeros(IxDyn(&[5, 1, 1]));
    for i in 0..5 {
        data[IxDyn(&[i, 0, 0])] = i as f64;
    }
    let image = SpatialImage::from_grid(data, VoxelGrid::unit([5, 1, 1])?)?;
    let options = ResampleOptions {
        order: 0,
        cval: -1.0,
        ..Default::default()
    };
    // 0.6 voxels rounds to the next sample
    let out = resample(
        &AffineTransform::translation(0.6, 0.0, 0.0),
        &image,
        Some(image.grid()),
        &options,
    )?;
    for i in 0..4 {
        assert_relative_eq!(out[IxDyn(&[i, 0, 0])], (i + 1) as f64);
    }
    assert_relative_eq!(out[IxDyn(&[4, 0, 0])], -1.0);
    Ok(())
}

#[test]
fn output_matches_the_reference_shape() -> Result<(), ResampleError> {
    let image = SpatialImage::from_grid(random_volume(&[5, 6, 7]), VoxelGrid::unit([5, 6, 7])?)?;
    let reference = VoxelGrid::unit([3, 4, 2])?;
    let out = resample(
        &AffineTransform::translation(0.25, 0.5, 0.75),
        &image,
        Some(&reference),
        &ResampleOptions::default(),
    )?;
    assert_eq!(out.shape(), &[3, 4, 2]);
    Ok(())
}

#[test]
fn refuses_to_run_without_a_reference() {
    let image = SpatialImage::from_grid(
        ArrayD::zeros(IxDyn(&[2, 2, 2])),
        VoxelGrid::unit([2, 2, 2]).expect("grid"),
    )
    .expect("image");
    let res = resample(
        &AffineTransform::identity(),
        &image,
        None,
        &ResampleOptions::default(),
    );
    assert!(matches!(res, Err(ResampleError::MissingReference)));
}

#[test]
fn falls_back_to_the_transform_reference() -> Result<(), ResampleError> {
    let image = SpatialImage::from_grid(
        ArrayD::from_elem(IxDyn(&[3, 3, 3]), 1.0),
        VoxelGrid::unit([3, 3, 3])?,
    )?;
    let shift = AffineTransform::identity().with_reference(VoxelGrid::unit([2, 2, 2])?);
    let out = resample(&shift, &image, None, &ResampleOptions::default())?;
    assert_eq!(out.shape(), &[2, 2, 2]);
    Ok(())
}

#[test]
fn rejects_mismatched_volume_counts() {
    let image = SpatialImage::from_grid(
        ArrayD::zeros(IxDyn(&[4, 4, 4, 2])),
        VoxelGrid::unit([4, 4, 4]).expect("grid"),
    )
    .expect("image");

    let series = AffineSeries::new(&[EYE, EYE, EYE]).expect("series");
    let res = resample(
        &series,
        &image,
        Some(image.grid()),
        &ResampleOptions::default(),
    );
    assert!(matches!(
        res,
        Err(ResampleError::VolumeCountMismatch {
            data: 2,
            expected: 3
        })
    ));

    let res = resample(
        &AffineTransform::identity(),
        &image,
        Some(image.grid()),
        &ResampleOptions::default(),
    );
    assert!(matches!(
        res,
        Err(ResampleError::VolumeCountMismatch {
            data: 2,
            expected: 1
        })
    ));
}

#[test]
fn boundary_modes_govern_outside_samples() -> Result<(), ResampleError> {
    let mut data = ArrayD::from_elem(IxDyn(&[3, 3, 3]), 2.0);
    data[IxDyn(&[0, 0, 0])] = 1.0;
    let image = SpatialImage::from_grid(data, VoxelGrid::unit([3, 3, 3])?)?;
    // the lone reference voxel sits one sample left of the source
    let reference = VoxelGrid::new(
        [1, 1, 1],
        [
            [1.0, 0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    )?;

    let constant = ResampleOptions {
        order: 1,
        cval: 5.0,
        ..Default::default()
    };
    let out = resample(
        &AffineTransform::identity(),
        &image,
        Some(&reference),
        &constant,
    )?;
    assert_relative_eq!(out[IxDyn(&[0, 0, 0])], 5.0);

    let nearest = ResampleOptions {
        order: 1,
        mode: ExtendMode::Nearest,
        ..Default::default()
    };
    let out = resample(
        &AffineTransform::identity(),
        &image,
        Some(&reference),
        &nearest,
    )?;
    assert_relative_eq!(out[IxDyn(&[0, 0, 0])], 1.0);
    Ok(())
}

#[test]
fn four_d_series_resamples_each_volume() -> Result<(), ResampleError> {
    let data = random_volume(&[4, 4, 4, 3]);
    let image = SpatialImage::from_grid(data.clone(), VoxelGrid::unit([4, 4, 4])?)?;
    let series = AffineSeries::new(&[EYE, EYE, EYE])?;
    let out = resample(
        &series,
        &image,
        Some(image.grid()),
        &ResampleOptions::default(),
    )?;
    assert_eq!(out.shape(), &[4, 4, 4, 3]);
    for (v, w) in out.iter().zip(data.iter()) {
        assert_relative_eq!(*v, *w, epsilon = 1e-8);
    }
    Ok(())
}

#[test]
fn each_volume_follows_its_own_matrix() -> Result<(), ResampleError> {
    let mut data = ArrayD::zeros(IxDyn(&[3, 1, 1, 2]));
    data[IxDyn(&[0, 0, 0, 0])] = 10.0;
    data[IxDyn(&[1, 0, 0, 0])] = 20.0;
    data[IxDyn(&[2, 0, 0, 0])] = 30.0;
    data[IxDyn(&[0, 0, 0, 1])] = 1.0;
    data[IxDyn(&[1, 0, 0, 1])] = 2.0;
    data[IxDyn(&[2, 0, 0, 1])] = 3.0;
    let image = SpatialImage::from_grid(data, VoxelGrid::unit([3, 1, 1])?)?;

    let shift = [
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let series = AffineSeries::new(&[EYE, shift])?;
    let options = ResampleOptions {
        order: 0,
        ..Default::default()
    };
    let out = resample(&series, &image, Some(image.grid()), &options)?;

    // volume 0 stays put, volume 1 samples one voxel to the right
    assert_relative_eq!(out[IxDyn(&[0, 0, 0, 0])], 10.0);
    assert_relative_eq!(out[IxDyn(&[1, 0, 0, 0])], 20.0);
    assert_relative_eq!(out[IxDyn(&[0, 0, 0, 1])], 2.0);
    assert_relative_eq!(out[IxDyn(&[1, 0, 0, 1])], 3.0);
    assert_relative_eq!(out[IxDyn(&[2, 0, 0, 1])], 0.0);
    Ok(())
}

#[test]
fn three_d_sources_are_broadcast_across_volumes() -> Result<(), ResampleError> {
    let data = random_volume(&[3, 3, 3]);
    let image = SpatialImage::from_grid(data.clone(), VoxelGrid::unit([3, 3, 3])?)?;
    let series = AffineSeries::new(&[EYE, EYE])?;
    let out = resample(
        &series,
        &image,
        Some(image.grid()),
        &ResampleOptions::default(),
    )?;
    assert_eq!(out.shape(), &[3, 3, 3, 2]);
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for t in 0..2 {
                    assert_relative_eq!(
                        out[IxDyn(&[i, j, k, t])],
                        data[IxDyn(&[i, j, k])],
                        epsilon = 1e-8
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn zero_displacement_field_is_an_identity() -> Result<(), ResampleError> {
    let data = random_volume(&[3, 4, 2]);
    let image = SpatialImage::from_grid(data.clone(), VoxelGrid::unit([3, 4, 2])?)?;
    let field = DenseFieldTransform::new(Array4::zeros((3, 4, 2, 3)), image.grid().clone())?;
    let options = ResampleOptions {
        order: 1,
        ..Default::default()
    };
    // no explicit reference: the field's own grid takes over
    let out = resample(&field, &image, None, &options)?;
    assert_eq!(out.shape(), &[3, 4, 2]);
    for (v, w) in out.iter().zip(data.iter()) {
        assert_relative_eq!(*v, *w, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn model_transforms_densify_onto_the_reference() -> Result<(), ResampleError> {
    let data = random_volume(&[6, 6, 6]);
    let image = SpatialImage::from_grid(data.clone(), VoxelGrid::unit([6, 6, 6])?)?;
    // knot lattice with 2-voxel spacing covering the volume
    let knots = VoxelGrid::new(
        [5, 5, 5],
        [
            [2.0, 0.0, 0.0, -2.0],
            [0.0, 2.0, 0.0, -2.0],
            [0.0, 0.0, 2.0, -2.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    )?;
    let model = BSplineFieldTransform::new(Array4::zeros((5, 5, 5, 3)), knots)?;
    let options = ResampleOptions {
        order: 1,
        ..Default::default()
    };
    let out = resample(&model, &image, Some(image.grid()), &options)?;
    for (v, w) in out.iter().zip(data.iter()) {
        assert_relative_eq!(*v, *w, epsilon = 1e-9);
    }
    Ok(())
}

#[test]
fn rejects_unsupported_orders_before_mapping() {
    let image = SpatialImage::from_grid(
        ArrayD::zeros(IxDyn(&[2, 2, 2])),
        VoxelGrid::unit([2, 2, 2]).expect("grid"),
    )
    .expect("image");
    let options = ResampleOptions {
        order: 6,
        ..Default::default()
    };
    let res = resample(
        &AffineTransform::identity(),
        &image,
        Some(image.grid()),
        &options,
    );
    assert!(matches!(
        res,
        Err(ResampleError::Interp(InterpError::UnsupportedOrder(6)))
    ));
}
