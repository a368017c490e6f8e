use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TopoError;

use super::model::{Building, Node, NodeKind, NodeSet, Position};

/// 1-based field holding the node label in ns-3 `set label "<id>" at x,y ...` lines.
const LABEL_FIELD: usize = 3;

/// Fields holding the two corners in `set building object N rect. from x0,y0 to x1,y1`.
const BUILDING_FROM_FIELD: usize = 7;
const BUILDING_TO_FIELD: usize = 9;

// ---------------------------------------------------------------------------
// Field and coordinate splitting
// ---------------------------------------------------------------------------

/// Return field `n` (1-based) of a record whose fields are separated by runs
/// of whitespace, the way awk's `$n` does. `n == 0` yields `None`.
pub fn extract_field(line: &str, n: usize) -> Option<&str> {
    n.checked_sub(1)
        .and_then(|idx| line.split_whitespace().nth(idx))
}

/// Split a coordinate field such as `12.5,40` into its numeric tokens.
/// Commas count as whitespace; empty tokens are dropped.
pub fn split_coordinates(field: &str) -> impl Iterator<Item = &str> {
    field
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
}

/// Lines the numeric loader never sees: blank or `#` comments.
fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_coordinates(field: &str, path: &Path, line: usize) -> Result<Vec<f64>, TopoError> {
    split_coordinates(field)
        .map(|tok| match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(TopoError::InvalidNumber {
                path: path.to_path_buf(),
                line,
                token: tok.to_string(),
            }),
        })
        .collect()
}

fn to_position(coords: &[f64], path: &Path, line: usize) -> Result<Position, TopoError> {
    match coords {
        [x, y, ..] => Ok(Position::new(*x, *y)),
        _ => Err(TopoError::TooFewCoordinates {
            path: path.to_path_buf(),
            line,
            found: coords.len(),
        }),
    }
}

fn required_field<'a>(
    record: &'a str,
    field: usize,
    path: &Path,
    line: usize,
) -> Result<&'a str, TopoError> {
    extract_field(record, field).ok_or_else(|| TopoError::MissingField {
        path: path.to_path_buf(),
        line,
        field,
    })
}

fn read_text(path: &Path) -> Result<String, TopoError> {
    fs::read_to_string(path).map_err(|e| TopoError::io(path, e))
}

// ---------------------------------------------------------------------------
// Node files (enbs.txt / ues.txt)
// ---------------------------------------------------------------------------

/// Load one node file, taking coordinates from field `field` of each record.
pub fn load_nodes(path: &Path, kind: NodeKind, field: usize) -> Result<NodeSet, TopoError> {
    let text = read_text(path)?;
    parse_nodes(&text, path, kind, field)
}

/// Parse node records from already-read text. `path` is only used in errors.
///
/// Every row must have the same number of coordinates; only the first two
/// are kept. A single record is not special: it yields a one-element set.
pub fn parse_nodes(
    text: &str,
    path: &Path,
    kind: NodeKind,
    field: usize,
) -> Result<NodeSet, TopoError> {
    let mut nodes = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, record) in text.lines().enumerate() {
        let line = idx + 1;
        if is_skippable(record) {
            continue;
        }

        let raw = required_field(record, field, path, line)?;
        let coords = parse_coordinates(raw, path, line)?;

        match width {
            None => width = Some(coords.len()),
            Some(expected) if expected != coords.len() && coords.len() >= 2 => {
                return Err(TopoError::RaggedRows {
                    path: path.to_path_buf(),
                    line,
                    expected,
                    found: coords.len(),
                });
            }
            Some(_) => {}
        }
        let position = to_position(&coords, path, line)?;

        let label = extract_field(record, LABEL_FIELD)
            .map(|l| l.trim_matches('"').to_string())
            .filter(|l| !l.is_empty());

        nodes.push(Node { label, position });
    }

    if nodes.is_empty() {
        return Err(TopoError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(NodeSet::new(kind, nodes))
}

// ---------------------------------------------------------------------------
// Building file
// ---------------------------------------------------------------------------

/// Load building rectangles from an ns-3 gnuplot building script.
/// Lines that are not `set building ...` statements are ignored.
pub fn load_buildings(path: &Path) -> Result<Vec<Building>, TopoError> {
    let text = read_text(path)?;
    parse_buildings(&text, path)
}

pub fn parse_buildings(text: &str, path: &Path) -> Result<Vec<Building>, TopoError> {
    let mut buildings = Vec::new();

    for (idx, record) in text.lines().enumerate() {
        let line = idx + 1;
        if extract_field(record, 1) != Some("set") || extract_field(record, 2) != Some("building")
        {
            continue;
        }

        let from = required_field(record, BUILDING_FROM_FIELD, path, line)?;
        let to = required_field(record, BUILDING_TO_FIELD, path, line)?;
        let a = to_position(&parse_coordinates(from, path, line)?, path, line)?;
        let b = to_position(&parse_coordinates(to, path, line)?, path, line)?;

        buildings.push(Building::from_corners(a, b));
    }

    Ok(buildings)
}

// ---------------------------------------------------------------------------
// Intermediate files
// ---------------------------------------------------------------------------

/// Write `<stem>_tem.txt` (the projected field, one per record) and
/// `<stem>_loc.txt` (the same with commas turned into spaces) next to the
/// input file. Blank and comment lines are not carried over.
pub fn write_intermediates(path: &Path, field: usize) -> Result<(PathBuf, PathBuf), TopoError> {
    let text = read_text(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("nodes");
    let tem_path = path.with_file_name(format!("{stem}_tem.txt"));
    let loc_path = path.with_file_name(format!("{stem}_loc.txt"));

    let mut tem = space_delimited_writer(&tem_path)?;
    let mut loc = space_delimited_writer(&loc_path)?;

    for (idx, record) in text.lines().enumerate() {
        if is_skippable(record) {
            continue;
        }
        let raw = required_field(record, field, path, idx + 1)?;
        tem.write_record([raw])
            .map_err(|e| csv_err(&tem_path, e))?;
        loc.write_record(raw.split(','))
            .map_err(|e| csv_err(&loc_path, e))?;
    }

    tem.flush().map_err(|e| TopoError::io(&tem_path, e))?;
    loc.flush().map_err(|e| TopoError::io(&loc_path, e))?;

    log::debug!(
        "Wrote intermediates {} and {}",
        tem_path.display(),
        loc_path.display()
    );
    Ok((tem_path, loc_path))
}

fn space_delimited_writer(path: &Path) -> Result<csv::Writer<fs::File>, TopoError> {
    csv::WriterBuilder::new()
        .delimiter(b' ')
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_err(path, e))
}

fn csv_err(path: &Path, e: csv::Error) -> TopoError {
    TopoError::io(path, e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> &'static Path {
        Path::new("nodes.txt")
    }

    fn label_line(id: u32, x: f64, y: f64) -> String {
        format!(
            "set label \"{id}\" at {x},{y} left font \"Helvetica,8\" textcolor rgb \"blue\" front  point pt 4 ps 0.3 lc rgb \"blue\" offset 0,0"
        )
    }

    #[test]
    fn extract_field_follows_awk_splitting() {
        let line = "  a \t b   c ";
        assert_eq!(extract_field(line, 1), Some("a"));
        assert_eq!(extract_field(line, 2), Some("b"));
        assert_eq!(extract_field(line, 3), Some("c"));
        assert_eq!(extract_field(line, 4), None);
        assert_eq!(extract_field(line, 0), None);
    }

    #[test]
    fn split_coordinates_treats_commas_as_spaces() {
        let toks: Vec<&str> = split_coordinates("1.5,-2,,3e2").collect();
        assert_eq!(toks, vec!["1.5", "-2", "3e2"]);
    }

    #[test]
    fn parses_many_ns3_label_records() {
        let text = [
            label_line(1, 0.0, 0.0),
            label_line(2, 120.5, 40.0),
            label_line(3, -30.0, 75.25),
        ]
        .join("\n");
        let set = parse_nodes(&text, p(), NodeKind::Enb, 5).unwrap();

        assert_eq!(set.len(), 3);
        let pts: Vec<Position> = set.positions().collect();
        assert_eq!(
            pts,
            vec![
                Position::new(0.0, 0.0),
                Position::new(120.5, 40.0),
                Position::new(-30.0, 75.25),
            ]
        );
        assert_eq!(set.nodes[1].label.as_deref(), Some("2"));
    }

    #[test]
    fn single_record_yields_single_point() {
        let set = parse_nodes(&label_line(7, 12.0, 34.0), p(), NodeKind::Ue, 5).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.nodes[0].position, Position::new(12.0, 34.0));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let text = format!("\n# header\n{}\n   \n", label_line(1, 1.0, 2.0));
        let set = parse_nodes(&text, p(), NodeKind::Ue, 5).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn third_coordinate_is_ignored() {
        let set = parse_nodes("a b c d 1,2,1.5\na b c d 3,4,1.5", p(), NodeKind::Ue, 5).unwrap();
        assert_eq!(set.nodes[1].position, Position::new(3.0, 4.0));
    }

    #[test]
    fn non_numeric_field_is_rejected_with_line_number() {
        let text = format!("{}\nset label \"2\" at here,there", label_line(1, 0.0, 0.0));
        let err = parse_nodes(&text, p(), NodeKind::Enb, 5).unwrap_err();
        match err {
            TopoError::InvalidNumber { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "here");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let cases = [
            ("a b c d inf,0", "inf"),
            ("a b c d nan,nan", "nan"),
            ("a b c d 1,-Infinity", "-Infinity"),
        ];
        for (text, bad) in cases {
            match parse_nodes(text, p(), NodeKind::Ue, 5).unwrap_err() {
                TopoError::InvalidNumber { line, token, .. } => {
                    assert_eq!(line, 1);
                    assert_eq!(token, bad);
                }
                other => panic!("unexpected error for {text}: {other}"),
            }
        }
    }

    #[test]
    fn huge_finite_values_still_load() {
        // Drawability of the range is decided by the renderer, not the parser.
        let set = parse_nodes("a b c d 1e308,-1e308", p(), NodeKind::Ue, 5).unwrap();
        assert_eq!(set.nodes[0].position, Position::new(1e308, -1e308));
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = parse_nodes("set label \"1\"", p(), NodeKind::Enb, 5).unwrap_err();
        assert!(matches!(err, TopoError::MissingField { line: 1, field: 5, .. }));
    }

    #[test]
    fn single_coordinate_is_rejected() {
        let err = parse_nodes("a b c d 42", p(), NodeKind::Enb, 5).unwrap_err();
        assert!(matches!(err, TopoError::TooFewCoordinates { found: 1, .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse_nodes("a b c d 1,2\na b c d 1,2,3", p(), NodeKind::Enb, 5).unwrap_err();
        assert!(matches!(
            err,
            TopoError::RaggedRows {
                line: 2,
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse_nodes("\n# nothing\n", p(), NodeKind::Ue, 5).unwrap_err();
        assert!(matches!(err, TopoError::Empty { .. }));
    }

    #[test]
    fn custom_field_index() {
        let set = parse_nodes("ue 7 3.5,4.5", p(), NodeKind::Ue, 3).unwrap();
        assert_eq!(set.nodes[0].position, Position::new(3.5, 4.5));
    }

    #[test]
    fn parses_building_rectangles() {
        let text = "\
set building object 1 rect. from 10,20 to 30,25 front fs empty
set label \"1\" at 0,0 left
set building object 2 rect. from 50,60 to 40,55 front fs empty
";
        let buildings = parse_buildings(text, p()).unwrap();
        assert_eq!(buildings.len(), 2);
        assert_eq!(
            buildings[1],
            Building {
                x_min: 40.0,
                y_min: 55.0,
                x_max: 50.0,
                y_max: 60.0,
            }
        );
    }

    #[test]
    fn truncated_building_line_is_rejected() {
        let err = parse_buildings("set building object 1 rect. from 1,2", p()).unwrap_err();
        assert!(matches!(err, TopoError::MissingField { field: 9, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_nodes(Path::new("/nonexistent/enbs.txt"), NodeKind::Enb, 5).unwrap_err();
        assert!(matches!(err, TopoError::Io { .. }));
    }

    #[test]
    fn intermediates_mirror_projected_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("enbs.txt");
        let text = format!("{}\n\n{}\n", label_line(1, 1.0, 2.0), label_line(2, 3.5, -4.0));
        fs::write(&input, text).unwrap();

        let (tem, loc) = write_intermediates(&input, 5).unwrap();
        assert_eq!(tem, dir.path().join("enbs_tem.txt"));
        assert_eq!(loc, dir.path().join("enbs_loc.txt"));
        assert_eq!(fs::read_to_string(tem).unwrap(), "1,2\n3.5,-4\n");
        assert_eq!(fs::read_to_string(loc).unwrap(), "1 2\n3.5 -4\n");
    }
}
