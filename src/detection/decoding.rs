use crate::engine::TensorData;
use crate::error::{DetectionError, Result};
use crate::models::{ProbabilityImage, ProbabilityMap, ValidSize};

/// Rebuild the probability map from a `[N, C, H, W]` network output.
///
/// Only the first plane is used. `valid` is the unpadded input size and must
/// fit inside the decoded map.
pub fn decode_output(output: TensorData, valid: ValidSize) -> Result<ProbabilityMap> {
    let TensorData { shape, mut data } = output;
    let shape_error = |len| DetectionError::OutputShape {
        shape: shape.clone(),
        len,
    };

    if shape.len() != 4 {
        return Err(shape_error(data.len()));
    }
    let (height, width) = (shape[2], shape[3]);
    let plane = match height.checked_mul(width) {
        Some(plane) if plane > 0 && data.len() >= plane => plane,
        _ => return Err(shape_error(data.len())),
    };
    let (Ok(map_width), Ok(map_height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(shape_error(data.len()));
    };
    if valid.width > map_width || valid.height > map_height {
        return Err(shape_error(data.len()));
    }

    data.truncate(plane);
    let map = ProbabilityImage::from_raw(map_width, map_height, data)
        .ok_or_else(|| shape_error(plane))?;

    Ok(ProbabilityMap { map, valid })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(width: u32, height: u32) -> ValidSize {
        ValidSize { width, height }
    }

    #[test]
    fn decodes_first_plane_row_major() {
        let output = TensorData {
            shape: vec![1, 1, 2, 3],
            data: vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5],
        };
        let map = decode_output(output, valid(3, 2)).unwrap();
        assert_eq!(map.map.dimensions(), (3, 2));
        assert_eq!(map.map.get_pixel(2, 1)[0], 0.5);
        assert_eq!(map.map.get_pixel(1, 0)[0], 0.1);
    }

    #[test]
    fn extra_planes_are_ignored() {
        let output = TensorData {
            shape: vec![1, 2, 1, 2],
            data: vec![0.1, 0.2, 0.9, 0.9],
        };
        let map = decode_output(output, valid(2, 1)).unwrap();
        assert_eq!(map.map.as_raw(), &vec![0.1, 0.2]);
    }

    #[test]
    fn rejects_wrong_rank() {
        let output = TensorData {
            shape: vec![2, 2],
            data: vec![0.0; 4],
        };
        assert!(matches!(
            decode_output(output, valid(2, 2)),
            Err(DetectionError::OutputShape { .. })
        ));
    }

    #[test]
    fn rejects_short_buffer() {
        let output = TensorData {
            shape: vec![1, 1, 4, 4],
            data: vec![0.0; 15],
        };
        assert!(decode_output(output, valid(4, 4)).is_err());
    }

    #[test]
    fn rejects_overflowing_extents() {
        let output = TensorData {
            shape: vec![1, 1, usize::MAX, 2],
            data: vec![0.0; 8],
        };
        let err = decode_output(output, valid(2, 2)).unwrap_err();
        assert!(matches!(err, DetectionError::OutputShape { len: 8, .. }));
    }

    #[test]
    fn rejects_zero_sized_plane() {
        let output = TensorData {
            shape: vec![1, 1, 0, 16],
            data: vec![0.0; 16],
        };
        assert!(matches!(
            decode_output(output, valid(0, 0)),
            Err(DetectionError::OutputShape { .. })
        ));
    }

    #[test]
    fn rejects_map_smaller_than_valid_region() {
        let output = TensorData {
            shape: vec![1, 1, 32, 32],
            data: vec![0.0; 1024],
        };
        assert!(decode_output(output, valid(40, 20)).is_err());
    }
}
