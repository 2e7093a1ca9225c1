#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array3;

/// Fresh scratch directory under `target/`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("it").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write `data` as a single-file NIfTI-1 volume of float32 voxels.
pub fn write_nifti(path: &Path, data: &Array3<f32>) {
    let (x, y, z) = data.dim();
    let mut header = vec![0u8; 352];

    let put_i16 = |buf: &mut [u8], at: usize, v: i16| buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
    let put_f32 = |buf: &mut [u8], at: usize, v: f32| buf[at..at + 4].copy_from_slice(&v.to_le_bytes());

    header[0..4].copy_from_slice(&348i32.to_le_bytes());
    header[38] = b'r';
    for (i, d) in [3, x as i16, y as i16, z as i16, 1, 1, 1, 1].into_iter().enumerate() {
        put_i16(&mut header, 40 + 2 * i, d);
    }
    put_i16(&mut header, 70, 16); // float32
    put_i16(&mut header, 72, 32);
    for i in 0..8 {
        put_f32(&mut header, 76 + 4 * i, 1.0);
    }
    put_f32(&mut header, 108, 352.0);
    put_f32(&mut header, 112, 1.0);
    header[344..348].copy_from_slice(b"n+1\0");

    // voxels are stored with the first axis varying fastest
    let mut bytes = header;
    for v in data.t().iter() {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    fs::write(path, bytes).unwrap();
}

pub fn constant_volume(dim: (usize, usize, usize), value: f32) -> Array3<f32> {
    Array3::from_elem(dim, value)
}

/// Ramp intensities with a labelled block in the middle of every slice.
pub fn phantom(dim: (usize, usize, usize)) -> (Array3<f32>, Array3<f32>) {
    let (x, y, _) = dim;
    let image = Array3::from_shape_fn(dim, |(i, j, k)| (i + j + k) as f32);
    let mask = Array3::from_shape_fn(dim, |(i, j, k)| {
        if (x / 4..3 * x / 4).contains(&i) && (y / 4..3 * y / 4).contains(&j) {
            (1 + k % 2) as f32
        } else {
            0.0
        }
    });
    (image, mask)
}
