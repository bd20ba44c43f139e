//! The statement parser: translates one line of the line-oriented query
//! language into a [`DbOperator`] the executor can dispatch, or a
//! [`ParseError`] carrying the status code to report back to the client.
//!
//! Strips the leading command keyword, requires a `(` / `)` pair around
//! the argument list, and splits arguments on `,`.

use columndb_engine::error::StatusCode;
use columndb_engine::operator::{
    AggOp, AggregateOperator, ArithOp, ArithmeticOperator, CreateOperator, DbOperator,
    FetchOperator, GeneralizedColumnRef, PrintOperator, SelectOperator, SelectSource,
};
use columndb_engine::operators::Bound;

#[derive(Debug)]
pub struct ParseError {
    pub status: StatusCode,
    pub message: String,
}

impl ParseError {
    fn incorrect_format(message: impl Into<String>) -> Self {
        ParseError {
            status: StatusCode::IncorrectFormat,
            message: message.into(),
        }
    }

    fn unknown_command(message: impl Into<String>) -> Self {
        ParseError {
            status: StatusCode::UnknownCommand,
            message: message.into(),
        }
    }
}

/// Parses one line. `Ok(None)` covers comment lines (`-- ...`) and blank
/// lines, both reported to the transport as `OK_DONE` no-ops.
pub fn parse_line(line: &str) -> Result<Option<DbOperator>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("--") {
        return Ok(None);
    }

    if line == "shutdown" {
        return Ok(Some(DbOperator::Shutdown));
    }

    if let Some(eq_pos) = line.find('=') {
        let handle = line[..eq_pos].trim();
        let expr = line[eq_pos + 1..].trim();
        validate_identifier(handle)?;
        return parse_bound_expr(handle, expr).map(Some);
    }

    parse_unbound_statement(line).map(Some)
}

fn validate_identifier(name: &str) -> Result<(), ParseError> {
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ParseError::incorrect_format(format!(
            "`{name}` is not a valid handle name"
        )));
    }
    Ok(())
}

/// `name(args)` → `(name, args-without-parens)`.
fn split_call(statement: &str) -> Result<(&str, &str), ParseError> {
    let open = statement
        .find('(')
        .ok_or_else(|| ParseError::incorrect_format("missing '(' in query"))?;
    if !statement.ends_with(')') {
        return Err(ParseError::incorrect_format("missing ')' in query"));
    }
    let name = statement[..open].trim();
    let args = &statement[open + 1..statement.len() - 1];
    Ok((name, args))
}

fn split_args(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    args.split(',').map(str::trim).collect()
}

fn trim_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

fn parse_bound(token: &str) -> Result<Option<i32>, ParseError> {
    if token == "null" {
        return Ok(None);
    }
    token
        .parse()
        .map(Some)
        .map_err(|_| ParseError::incorrect_format(format!("`{token}` is not a valid bound")))
}

fn parse_bound_expr(handle: &str, expr: &str) -> Result<DbOperator, ParseError> {
    let (name, args) = split_call(expr)?;
    let parts = split_args(args);

    match name {
        "select" => parse_select(handle, &parts),
        "fetch" => parse_fetch(handle, &parts),
        "add" => parse_arithmetic(handle, ArithOp::Add, &parts),
        "sub" => parse_arithmetic(handle, ArithOp::Sub, &parts),
        "sum" => parse_aggregate(handle, AggOp::Sum, &parts),
        "avg" => parse_aggregate(handle, AggOp::Avg, &parts),
        "min" => parse_aggregate(handle, AggOp::Min, &parts),
        "max" => parse_aggregate(handle, AggOp::Max, &parts),
        other => Err(ParseError::unknown_command(format!("unknown expression `{other}`"))),
    }
}

fn parse_select(handle: &str, parts: &[&str]) -> Result<DbOperator, ParseError> {
    match parts {
        [column, low, high] => Ok(DbOperator::Select(SelectOperator {
            source: SelectSource::Column(column.to_string()),
            bound: Bound {
                low: parse_bound(low)?,
                high: parse_bound(high)?,
            },
            handle: handle.to_string(),
        })),
        [positions, values, low, high] => Ok(DbOperator::Select(SelectOperator {
            source: SelectSource::Domain {
                positions_handle: positions.to_string(),
                values_handle: values.to_string(),
            },
            bound: Bound {
                low: parse_bound(low)?,
                high: parse_bound(high)?,
            },
            handle: handle.to_string(),
        })),
        _ => Err(ParseError::incorrect_format(
            "select takes (column, low, high) or (positions, values, low, high)",
        )),
    }
}

fn parse_fetch(handle: &str, parts: &[&str]) -> Result<DbOperator, ParseError> {
    match parts {
        [column, positions] => Ok(DbOperator::Fetch(FetchOperator {
            column: column.to_string(),
            positions_handle: positions.to_string(),
            handle: handle.to_string(),
        })),
        _ => Err(ParseError::incorrect_format("fetch takes (column, positions)")),
    }
}

fn parse_arithmetic(handle: &str, op: ArithOp, parts: &[&str]) -> Result<DbOperator, ParseError> {
    match parts {
        [left, right] => Ok(DbOperator::Arithmetic(ArithmeticOperator {
            op,
            left_handle: left.to_string(),
            right_handle: right.to_string(),
            handle: handle.to_string(),
        })),
        _ => Err(ParseError::incorrect_format("arithmetic takes (a, b)")),
    }
}

fn parse_aggregate(handle: &str, op: AggOp, parts: &[&str]) -> Result<DbOperator, ParseError> {
    match parts {
        [x] => {
            let input = if x.contains('.') {
                GeneralizedColumnRef::Column(x.to_string())
            } else {
                GeneralizedColumnRef::Handle(x.to_string())
            };
            Ok(DbOperator::Aggregate(AggregateOperator {
                op,
                input,
                handle: handle.to_string(),
            }))
        }
        _ => Err(ParseError::incorrect_format("aggregate takes a single argument")),
    }
}

fn parse_unbound_statement(statement: &str) -> Result<DbOperator, ParseError> {
    let (name, args) = split_call(statement)?;
    match name {
        "create" => parse_create(args),
        "relational_insert" => parse_insert(args),
        "load" => parse_load(args),
        "print" => parse_print(args),
        other => Err(ParseError::unknown_command(format!("unknown command `{other}`"))),
    }
}

fn parse_create(args: &str) -> Result<DbOperator, ParseError> {
    let parts = split_args(args);
    let (kind, rest) = parts
        .split_first()
        .ok_or_else(|| ParseError::incorrect_format("create requires a target"))?;

    match *kind {
        "db" => match rest {
            [name] => Ok(DbOperator::Create(CreateOperator::Db {
                name: trim_quotes(name).to_string(),
            })),
            _ => Err(ParseError::incorrect_format("create(db,\"name\") takes one argument")),
        },
        "tbl" => match rest {
            [name, db, num_columns] => {
                let num_columns: usize = num_columns.parse().map_err(|_| {
                    ParseError::incorrect_format(format!("`{num_columns}` is not a column count"))
                })?;
                Ok(DbOperator::Create(CreateOperator::Table {
                    db: db.to_string(),
                    name: trim_quotes(name).to_string(),
                    num_columns,
                }))
            }
            _ => Err(ParseError::incorrect_format(
                "create(tbl,\"name\",db,ncols) takes three arguments",
            )),
        },
        "col" => match rest {
            [name, table] => Ok(DbOperator::Create(CreateOperator::Column {
                table: table.to_string(),
                name: trim_quotes(name).to_string(),
            })),
            _ => Err(ParseError::incorrect_format(
                "create(col,\"name\",db.table) takes two arguments",
            )),
        },
        other => Err(ParseError::unknown_command(format!("unknown create target `{other}`"))),
    }
}

fn parse_insert(args: &str) -> Result<DbOperator, ParseError> {
    let parts = split_args(args);
    match parts.split_first() {
        Some((table, values)) => {
            let mut row = Vec::with_capacity(values.len());
            for value in values {
                let value: i32 = value
                    .parse()
                    .map_err(|_| ParseError::incorrect_format(format!("`{value}` is not an integer")))?;
                row.push(value);
            }
            Ok(DbOperator::Insert {
                table: table.to_string(),
                row,
            })
        }
        None => Err(ParseError::incorrect_format("relational_insert requires a table")),
    }
}

fn parse_load(args: &str) -> Result<DbOperator, ParseError> {
    let parts = split_args(args);
    match parts.as_slice() {
        [path] => Ok(DbOperator::Load {
            path: trim_quotes(path).into(),
        }),
        _ => Err(ParseError::incorrect_format("load(\"path\") takes one argument")),
    }
}

fn parse_print(args: &str) -> Result<DbOperator, ParseError> {
    let parts = split_args(args);
    if parts.is_empty() {
        return Err(ParseError::incorrect_format("print requires at least one handle"));
    }
    Ok(DbOperator::Print(PrintOperator {
        targets: parts.into_iter().map(str::to_string).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_no_ops() {
        assert!(parse_line("-- a comment").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
    }

    #[test]
    fn shutdown_is_recognized() {
        assert!(matches!(parse_line("shutdown").unwrap(), Some(DbOperator::Shutdown)));
    }

    #[test]
    fn create_db_parses_the_quoted_name() {
        let op = parse_line("create(db,\"d1\")").unwrap().unwrap();
        match op {
            DbOperator::Create(CreateOperator::Db { name }) => assert_eq!(name, "d1"),
            _ => panic!("expected CreateOperator::Db"),
        }
    }

    #[test]
    fn create_tbl_parses_all_three_arguments() {
        let op = parse_line("create(tbl,\"t1\",d1,2)").unwrap().unwrap();
        match op {
            DbOperator::Create(CreateOperator::Table { db, name, num_columns }) => {
                assert_eq!(db, "d1");
                assert_eq!(name, "t1");
                assert_eq!(num_columns, 2);
            }
            _ => panic!("expected CreateOperator::Table"),
        }
    }

    #[test]
    fn relational_insert_parses_integer_values() {
        let op = parse_line("relational_insert(d1.t1,10,100)").unwrap().unwrap();
        match op {
            DbOperator::Insert { table, row } => {
                assert_eq!(table, "d1.t1");
                assert_eq!(row, vec![10, 100]);
            }
            _ => panic!("expected Insert"),
        }
    }

    #[test]
    fn select_with_a_qualified_column_is_a_full_scan() {
        let op = parse_line("s=select(d1.t1.a,15,35)").unwrap().unwrap();
        match op {
            DbOperator::Select(SelectOperator { source, bound, handle }) => {
                assert!(matches!(source, SelectSource::Column(c) if c == "d1.t1.a"));
                assert_eq!(bound.low, Some(15));
                assert_eq!(bound.high, Some(35));
                assert_eq!(handle, "s");
            }
            _ => panic!("expected Select"),
        }
    }

    #[test]
    fn select_with_two_handles_is_a_domain_scan() {
        let op = parse_line("s2=select(s1,v1,150,null)").unwrap().unwrap();
        match op {
            DbOperator::Select(SelectOperator { source, bound, .. }) => {
                match source {
                    SelectSource::Domain { positions_handle, values_handle } => {
                        assert_eq!(positions_handle, "s1");
                        assert_eq!(values_handle, "v1");
                    }
                    _ => panic!("expected a domain scan"),
                }
                assert_eq!(bound.low, Some(150));
                assert_eq!(bound.high, None);
            }
            _ => panic!("expected Select"),
        }
    }

    #[test]
    fn null_bounds_are_unbounded() {
        let op = parse_line("s=select(d1.t1.a,null,null)").unwrap().unwrap();
        match op {
            DbOperator::Select(SelectOperator { bound, .. }) => {
                assert_eq!(bound.low, None);
                assert_eq!(bound.high, None);
            }
            _ => panic!("expected Select"),
        }
    }

    #[test]
    fn fetch_parses_column_and_positions_handle() {
        let op = parse_line("v=fetch(d1.t1.b,s)").unwrap().unwrap();
        match op {
            DbOperator::Fetch(FetchOperator { column, positions_handle, handle }) => {
                assert_eq!(column, "d1.t1.b");
                assert_eq!(positions_handle, "s");
                assert_eq!(handle, "v");
            }
            _ => panic!("expected Fetch"),
        }
    }

    #[test]
    fn aggregate_accepts_a_bare_handle_or_a_qualified_column() {
        let by_handle = parse_line("m=sum(v)").unwrap().unwrap();
        match by_handle {
            DbOperator::Aggregate(AggregateOperator { input, .. }) => {
                assert!(matches!(input, GeneralizedColumnRef::Handle(h) if h == "v"));
            }
            _ => panic!("expected Aggregate"),
        }

        let by_column = parse_line("m=sum(d1.t1.a)").unwrap().unwrap();
        match by_column {
            DbOperator::Aggregate(AggregateOperator { input, .. }) => {
                assert!(matches!(input, GeneralizedColumnRef::Column(c) if c == "d1.t1.a"));
            }
            _ => panic!("expected Aggregate"),
        }
    }

    #[test]
    fn print_collects_every_handle_in_order() {
        let op = parse_line("print(h1,h2,h3)").unwrap().unwrap();
        match op {
            DbOperator::Print(PrintOperator { targets }) => {
                assert_eq!(targets, vec!["h1", "h2", "h3"]);
            }
            _ => panic!("expected Print"),
        }
    }

    #[test]
    fn load_strips_quotes_from_the_path() {
        let op = parse_line("load(\"/tmp/data.csv\")").unwrap().unwrap();
        match op {
            DbOperator::Load { path } => assert_eq!(path.to_str().unwrap(), "/tmp/data.csv"),
            _ => panic!("expected Load"),
        }
    }

    #[test]
    fn a_missing_open_paren_is_incorrect_format() {
        let err = parse_line("create db,\"d1\")").unwrap_err();
        assert_eq!(err.status, StatusCode::IncorrectFormat);
    }

    #[test]
    fn an_unknown_command_is_reported_as_such() {
        let err = parse_line("frobnicate(x)").unwrap_err();
        assert_eq!(err.status, StatusCode::UnknownCommand);
    }
}
