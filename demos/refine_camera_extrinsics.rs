//! Example: refining camera extrinsics from 3D-2D correspondences
//!
//! Twelve known 3D points and their undistorted image locations are given,
//! along with the camera intrinsics. Starting from a rough pose estimate,
//! Gauss-Newton minimizes the per-point reprojection distances over the six
//! pose parameters: a translation and a rotation vector (axis times angle).

use nalgebra::{Matrix3, Point2, Rotation3, Vector3};
use nonlinopt::prelude::*;

const POINTS_3D: [[f64; 3]; 12] = [
    [2.63002813e+00, -4.73064234e+00, 1.50618167e+00],
    [-3.70349293e+00, 3.58105095e+00, 7.86752797e-01],
    [1.68537623e+00, -1.86170394e+00, 5.30748778e-01],
    [1.60094696e+00, 2.24767697e+00, 1.15206023e+00],
    [3.43645179e+00, -5.97678911e+00, 1.33917919e+00],
    [-2.09627415e+00, -2.84170710e+00, 1.46094717e+00],
    [-4.02440345e+00, 9.15705246e+00, 5.04084267e-01],
    [7.86630456e-03, -9.39415873e+00, 1.72543266e+00],
    [6.31172900e+00, -4.32363882e+00, 3.68004833e-02],
    [-1.59925565e+00, -3.84276957e+00, 1.06966253e+00],
    [8.42769011e-01, -5.29161544e-02, 1.98306005e+00],
    [2.46506435e+00, -2.72676961e+00, 1.45703557e+00],
];

const POINTS_2D: [[f64; 2]; 12] = [
    [1098.25084077, 319.19005757],
    [770.58023797, 904.74989049],
    [974.60672688, 420.7363441],
    [720.49421605, 416.06945914],
    [1119.69792767, 301.9548112],
    [1259.34672737, 535.38400951],
    [-306.55794983, 1371.9341184],
    [1452.21515004, 366.3347584],
    [942.75102179, 300.49781786],
    [1274.85313494, 521.25535014],
    [914.6726082, 375.07103224],
    [1003.74442446, 335.1878995],
];

/// Pinhole camera with known intrinsics.
struct Camera {
    intrinsics: Matrix3<f64>,
}

impl Camera {
    /// Projects a world point with pose `x = (t, r)`.
    fn project(&self, x: &DVector<f64>, point: &Vector3<f64>) -> Point2<f64> {
        let translation = Vector3::new(x[0], x[1], x[2]);
        let rotation = Rotation3::new(Vector3::new(x[3], x[4], x[5]));
        let xyw = self.intrinsics * (rotation * point + translation);
        Point2::new(xyw.x / xyw.z, xyw.y / xyw.z)
    }

    /// Distance between each observed and reprojected image point.
    fn reprojection_distances(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            POINTS_3D.len(),
            POINTS_3D.iter().zip(POINTS_2D.iter()).map(|(p3, p2)| {
                let projected = self.project(x, &Vector3::from(*p3));
                (Point2::from(*p2) - projected).norm()
            }),
        )
    }
}

fn main() -> Result<()> {
    println!("Camera extrinsics refinement");
    println!("============================\n");

    #[rustfmt::skip]
    let intrinsics = Matrix3::new(
        866.4245, 0.0, 736.4805,
        0.0, 875.8444, 174.83566,
        0.0, 0.0, 1.0,
    );
    let camera = Camera { intrinsics };

    // Initial pose from a PnP estimate: translation, then rotation vector.
    let mut x = DVector::from_vec(vec![
        2.2066754, 4.8928096, 10.064986, 1.2037287, -1.555427, 1.6341713,
    ]);
    let x_gt = DVector::from_vec(vec![
        2.3066754, 4.6928096, 10.964986, 1.3037287, -1.6955427, 1.3341713,
    ]);

    let residuals = |x: &DVector<f64>| camera.reprojection_distances(x);
    println!("Initial mean reprojection error: {:.4} px", residuals(&x).mean());

    let config = MinimizerConfig::new()
        .with_max_iterations(10_000)
        .with_tolerance(1e-12);
    let mut minimizer = GaussNewton::minimizer(residuals, config)?;
    let info = minimizer.run(&mut x)?;

    let final_error = camera.reprojection_distances(&x).mean();
    println!("Result: {info} after {} iterations", minimizer.history().len());
    println!("Final mean reprojection error: {final_error:.6} px");
    println!("x = {}", x.transpose());
    println!("Distance to reference pose: {:.6}", (&x_gt - &x).norm());

    Ok(())
}
