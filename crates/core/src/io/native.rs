//! Native GeoTIFF reading/writing on top of the `tiff` crate.
//!
//! Only the georeferencing tags needed to place pixels in world space are
//! understood: ModelPixelScale + ModelTiepoint, or ModelTransformation, plus
//! the GDAL_NODATA ASCII tag.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tiff::ColorType;

// The decoder maps these codes (33550, 33922, 34264, 34735, 42113) to named
// variants; `Tag::Unknown(code)` never matches them on read.
const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const MODEL_TRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

/// Read the first band of a GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file))
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

fn cast_samples<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());

    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => return Err(Error::UnsupportedBandCount(format!("{:?}", other))),
    }

    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;
    let transform = read_geotransform(&mut decoder);
    let nodata = read_nodata(&mut decoder);

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::U8(buf) => cast_samples(buf),
        DecodingResult::U16(buf) => cast_samples(buf),
        DecodingResult::U32(buf) => cast_samples(buf),
        DecodingResult::U64(buf) => cast_samples(buf),
        DecodingResult::I8(buf) => cast_samples(buf),
        DecodingResult::I16(buf) => cast_samples(buf),
        DecodingResult::I32(buf) => cast_samples(buf),
        DecodingResult::I64(buf) => cast_samples(buf),
        DecodingResult::F32(buf) => cast_samples(buf),
        DecodingResult::F64(buf) => cast_samples(buf),
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = transform {
        raster.set_transform(transform);
    }
    raster.set_nodata(nodata);

    Ok(raster)
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).ok();
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT).ok();

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if scale.len() >= 2 && tiepoint.len() >= 6 {
            // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
            let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
            let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
            return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
        }
    }

    decoder
        .get_tag_f64_vec(MODEL_TRANSFORMATION)
        .ok()
        .and_then(|matrix| GeoTransform::from_model_transformation(&matrix))
}

fn read_nodata<T: RasterElement, R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<T> {
    let text = decoder.get_tag_ascii_string(GDAL_NODATA).ok()?;
    let value: f64 = text.trim_matches(char::from(0)).trim().parse().ok()?;
    num_traits::cast(value)
}

/// Write a Raster to a GeoTIFF file as 32-bit float, replacing any existing
/// file.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    encode_geotiff(raster, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf))?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder.new_image::<Gray32Float>(cols as u32, rows as u32)?;
    let gt = raster.transform();

    if gt.row_rotation == 0.0 && gt.col_rotation == 0.0 {
        let scale = [gt.pixel_width, -gt.pixel_height, 0.0];
        image.encoder().write_tag(MODEL_PIXEL_SCALE, &scale[..])?;
        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        image.encoder().write_tag(MODEL_TIEPOINT, &tiepoint[..])?;
    } else {
        let matrix = [
            gt.pixel_width, gt.row_rotation, 0.0, gt.origin_x, //
            gt.col_rotation, gt.pixel_height, 0.0, gt.origin_y, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        image.encoder().write_tag(MODEL_TRANSFORMATION, &matrix[..])?;
    }

    // Version 1.1.0 with two keys: ModelTypeProjected, RasterPixelIsArea.
    let geokeys: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 1, 1025, 0, 1, 1];
    image.encoder().write_tag(GEO_KEY_DIRECTORY, &geokeys[..])?;

    if let Some(nodata) = raster.nodata().and_then(|v| v.to_f64()) {
        let text = nodata.to_string();
        image.encoder().write_tag(GDAL_NODATA, text.as_str())?;
    }

    image.write_data(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_raster() -> Raster<f64> {
        let data = (0..12).map(|v| v as f64 * 1.5).collect();
        let mut raster = Raster::from_vec(data, 3, 4).unwrap();
        raster.set_transform(GeoTransform::new(480000.0, 5100000.0, 30.0, -30.0));
        raster.set(2, 3, -9999.0).unwrap();
        raster.set_nodata(Some(-9999.0));
        raster
    }

    #[test]
    fn test_buffer_preserves_georeferencing() {
        let raster = sample_raster();
        let bytes = write_geotiff_to_buffer(&raster).unwrap();
        let decoded: Raster<f64> = read_geotiff_from_buffer(&bytes).unwrap();

        assert_eq!(decoded.shape(), (3, 4));
        assert_eq!(decoded.transform(), raster.transform());
        assert_eq!(decoded.nodata(), Some(-9999.0));
        assert_relative_eq!(decoded.get(1, 2).unwrap(), 9.0);
        assert_relative_eq!(decoded.get(2, 3).unwrap(), -9999.0);
    }

    #[test]
    fn test_georeferencing_tags_are_found() {
        let bytes = write_geotiff_to_buffer(&sample_raster()).unwrap();
        let mut decoder = Decoder::new(Cursor::new(&bytes[..])).unwrap();

        let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).unwrap();
        assert_eq!(&scale[..2], &[30.0, 30.0]);
        let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT).unwrap();
        assert_eq!(&tiepoint[3..5], &[480000.0, 5100000.0]);
        assert!(decoder.find_tag(GEO_KEY_DIRECTORY).unwrap().is_some());

        let nodata = decoder.get_tag_ascii_string(GDAL_NODATA).unwrap();
        assert_eq!(nodata.trim_matches(char::from(0)), "-9999");
    }

    #[test]
    fn test_rotated_transform_uses_matrix_tag() {
        let mut raster = Raster::<f64>::filled(2, 2, 5.0);
        let mut gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        gt.row_rotation = 2.0;
        raster.set_transform(gt);

        let bytes = write_geotiff_to_buffer(&raster).unwrap();
        let mut decoder = Decoder::new(Cursor::new(&bytes[..])).unwrap();
        assert!(decoder.find_tag(MODEL_TRANSFORMATION).unwrap().is_some());
        assert!(decoder.find_tag(MODEL_PIXEL_SCALE).unwrap().is_none());

        let decoded: Raster<f64> = read_geotiff_from_buffer(&bytes).unwrap();
        assert_eq!(decoded.transform(), &gt);
    }

    #[test]
    fn test_file_overwrite() {
        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&Raster::<f64>::filled(2, 2, 1.0), tmp.path()).unwrap();
        write_geotiff(&sample_raster(), tmp.path()).unwrap();

        let decoded: Raster<f32> = read_geotiff(tmp.path()).unwrap();
        assert_eq!(decoded.shape(), (3, 4));
    }

    #[test]
    fn test_missing_file() {
        let result = read_geotiff::<f64, _>("/nonexistent/dem.tif");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_rejects_non_tiff() {
        let result = read_geotiff_from_buffer::<f64>(b"definitely not a tiff");
        assert!(matches!(result, Err(Error::Tiff(_))));
    }
}
