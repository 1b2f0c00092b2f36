/// Parser for compact textual transform expressions
///
/// ```text
/// matrix   m00 m01 ... m33                      (16 values, row-major)
/// computed m00 m01 ... m33
/// rotate   AX AY AZ ANGLE[deg|rad] [about PX PY PZ]
/// translate TX TY TZ
/// scale    SX SY SZ [origin OX OY OZ]
/// ```
use nalgebra::{Point3, Vector3};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, map, opt, value},
    multi::count,
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{TransformError, TransformResult};
use crate::transform::{AngleUnit, TransformSpec};

/// Parse a transform expression. Rotation angles default to degrees.
pub fn parse_transform(input: &str) -> TransformResult<TransformSpec> {
    match all_consuming(delimited(multispace0, parse_expr, multispace0))(input) {
        Ok((_, spec)) => Ok(spec),
        Err(e) => Err(TransformError::invalid(format!(
            "failed to parse transform expression {input:?}: {e:?}"
        ))),
    }
}

fn parse_expr(input: &str) -> IResult<&str, TransformSpec> {
    alt((
        parse_matrix,
        parse_computed,
        parse_rotate,
        parse_translate,
        parse_scale,
    ))(input)
}

fn parse_matrix(input: &str) -> IResult<&str, TransformSpec> {
    let (input, _) = tag("matrix")(input)?;
    let (input, matrix) = parse_matrix16(input)?;
    Ok((input, TransformSpec::Manual { matrix }))
}

fn parse_computed(input: &str) -> IResult<&str, TransformSpec> {
    let (input, _) = tag("computed")(input)?;
    let (input, matrix) = parse_matrix16(input)?;
    Ok((input, TransformSpec::Computed { matrix }))
}

fn parse_rotate(input: &str) -> IResult<&str, TransformSpec> {
    let (input, _) = tag("rotate")(input)?;
    let (input, axis) = parse_vector3(input)?;
    let (input, angle) = parse_number(input)?;
    let (input, unit) = opt(preceded(multispace0, parse_unit))(input)?;
    let (input, point) = opt(preceded(preceded(multispace1, tag("about")), parse_point3))(input)?;

    Ok((
        input,
        TransformSpec::rotation_about(
            axis,
            angle,
            unit.unwrap_or_default(),
            point.unwrap_or_else(Point3::origin),
        ),
    ))
}

fn parse_translate(input: &str) -> IResult<&str, TransformSpec> {
    let (input, _) = tag("translate")(input)?;
    let (input, offset) = parse_vector3(input)?;
    Ok((input, TransformSpec::Translation { offset }))
}

fn parse_scale(input: &str) -> IResult<&str, TransformSpec> {
    let (input, _) = tag("scale")(input)?;
    let (input, factors) = parse_vector3(input)?;
    let (input, origin) = opt(preceded(preceded(multispace1, tag("origin")), parse_point3))(input)?;
    Ok((input, TransformSpec::Scale { factors, origin }))
}

fn parse_unit(input: &str) -> IResult<&str, AngleUnit> {
    alt((
        value(AngleUnit::Degrees, tag("deg")),
        value(AngleUnit::Radians, tag("rad")),
    ))(input)
}

fn parse_matrix16(input: &str) -> IResult<&str, [f32; 16]> {
    let (input, values) = count(parse_number, 16)(input)?;
    let mut matrix = [0.0; 16];
    matrix.copy_from_slice(&values);
    Ok((input, matrix))
}

fn parse_point3(input: &str) -> IResult<&str, Point3<f32>> {
    map(parse_vector3, Point3::from)(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    map(tuple((parse_number, parse_number, parse_number)), |(x, y, z)| {
        Vector3::new(x, y, z)
    })(input)
}

fn parse_number(input: &str) -> IResult<&str, f32> {
    preceded(multispace1, float)(input)
}
