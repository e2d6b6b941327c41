/// STL import as wireframe scene objects
///
/// Only the triangle corners are kept. Corners shared between facets are
/// welded into one point and every triangle side becomes one edge, so a
/// closed mesh turns into its wireframe.
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use std::collections::{BTreeSet, HashMap};

use crate::error::SceneError;
use crate::scene::{Rgb, SceneObject};

/// Three triangle corners
pub type Facet = [Point3<f64>; 3];

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse STL bytes, ASCII or binary
pub fn parse_stl(data: &[u8]) -> Result<Vec<Facet>, SceneError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(facets) => return Ok(facets),
                Err(e) => log::debug!("Not ASCII STL, trying binary: {}", e),
            }
        }
    }

    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Vec<Facet>, SceneError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(SceneError::Stl(format!(
            "{} bytes is too small for a binary STL header",
            data.len()
        )));
    }

    let (_, (_, facet_count)) = tuple((take(HEADER_LEN), le_u32))(data)
        .map_err(|e| nom_error(data, e))?;
    let expected = HEADER_LEN + 4 + facet_count as usize * FACET_LEN;
    if data.len() < expected {
        return Err(SceneError::Stl(format!(
            "header announces {} facets ({} bytes) but the file has {} bytes",
            facet_count,
            expected,
            data.len()
        )));
    }

    let (_, facets) = preceded(
        take(HEADER_LEN + 4),
        count(binary_facet, facet_count as usize),
    )(data)
    .map_err(|e| nom_error(data, e))?;
    Ok(facets)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, _normal) = take(12usize)(input)?;
    let (input, (a, b, c)) = tuple((binary_vertex, binary_vertex, binary_vertex))(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, [a, b, c]))
}

fn binary_vertex(input: &[u8]) -> IResult<&[u8], Point3<f64>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x as f64, y as f64, z as f64)))
}

fn nom_error(data: &[u8], e: nom::Err<nom::error::Error<&[u8]>>) -> SceneError {
    match e {
        nom::Err::Incomplete(_) => SceneError::Stl("unexpected end of file".to_string()),
        nom::Err::Error(e) | nom::Err::Failure(e) => SceneError::Stl(format!(
            "{:?} at byte {}",
            e.code,
            data.len() - e.input.len()
        )),
    }
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Vec<Facet>, SceneError> {
    match ascii_solid(input) {
        Ok((_, facets)) => Ok(facets),
        Err(e) => Err(SceneError::Stl(format!("malformed ASCII STL: {:?}", e.map(|e| e.code)))),
    }
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = keyword("solid")(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = keyword("endsolid")(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = keyword("facet")(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_triple(input)?;
    let (input, _) = keyword("outer")(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = keyword("endloop")(input)?;
    let (input, _) = keyword("endfacet")(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = keyword("vertex")(input)?;
    ascii_triple(input)
}

fn ascii_triple(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, (x, y, z)) = tuple((
        preceded(multispace1, double),
        preceded(multispace1, double),
        preceded(multispace1, double),
    ))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Weld facet corners and collect the unique triangle sides
pub fn wireframe(facets: &[Facet], color: Rgb) -> Result<SceneObject, SceneError> {
    let mut points = Vec::new();
    let mut index_of: HashMap<[u64; 3], usize> = HashMap::new();
    let mut edges = BTreeSet::new();

    for facet in facets {
        let corners = facet.map(|corner| {
            // Adding 0.0 folds -0.0 into 0.0
            let key = [
                (corner.x + 0.0).to_bits(),
                (corner.y + 0.0).to_bits(),
                (corner.z + 0.0).to_bits(),
            ];
            *index_of.entry(key).or_insert_with(|| {
                points.push(corner);
                points.len() - 1
            })
        });

        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            let (a, b) = (corners[a], corners[b]);
            if a != b {
                edges.insert((a.min(b), a.max(b)));
            }
        }
    }

    log::debug!(
        "STL wireframe: {} facets welded into {} points and {} edges",
        facets.len(),
        points.len(),
        edges.len()
    );

    SceneObject::new(points, edges.into_iter().collect(), color, false)
}

/// Parse STL bytes straight into a wireframe object
pub fn load_stl_object(data: &[u8], color: Rgb) -> Result<SceneObject, SceneError> {
    let facets = parse_stl(data)?;
    wireframe(&facets, color)
}
