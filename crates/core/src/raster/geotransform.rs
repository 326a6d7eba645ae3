//! Affine georeferencing for rasters

/// Affine transformation coefficients for georeferencing rasters.
///
/// Maps pixel coordinates (col, row) to world coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images the rotation terms are 0 and `pixel_height` is
/// negative, so world y decreases as the row index grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Rotation term applied to rows when computing x (usually 0)
    pub row_rotation: f64,
    /// Rotation term applied to columns when computing y (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a north-up transform without rotation
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from the 16 coefficients of a GeoTIFF `ModelTransformationTag`
    /// (row-major 4x4 matrix). Returns `None` for a short tag.
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 8 {
            return None;
        }
        Some(Self {
            origin_x: matrix[3],
            pixel_width: matrix[0],
            row_rotation: matrix[1],
            origin_y: matrix[7],
            col_rotation: matrix[4],
            pixel_height: matrix[5],
        })
    }

    /// Convert pixel indices to world coordinates of the pixel's top-left
    /// corner.
    pub fn pixel_to_world(&self, col: usize, row: usize) -> (f64, f64) {
        let col_f = col as f64;
        let row_f = row as f64;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Horizontal cell size
    pub fn cell_size_x(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Vertical cell size
    pub fn cell_size_y(&self) -> f64 {
        self.pixel_height.abs()
    }

    /// Check if this is a north-up image (no rotation)
    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-10
            && self.col_rotation.abs() < 1e-10
            && self.pixel_height < 0.0
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of a raster of given size
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let corners = [
            self.pixel_to_world(0, 0),
            self.pixel_to_world(width, 0),
            self.pixel_to_world(0, height),
            self.pixel_to_world(width, height),
        ];

        corners.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}
