//! Dot command dispatch

use repindex::{
    Error, FilterScope, IdAndVersion, ReplicaIndex, ReplicationType, Result, SqlContext, SubType,
    TableType, ViewFilter,
};
use std::collections::BTreeSet;

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

pub const HELP: &str = "\
Available commands:
  .table <id>                        Register a table
  .view <id> <kind>                  Register a view (entityview, dataset, datasetcollection, submissionview)
  .mv <id> <source>...               Register a materialized view over sources, in order
  .vt <id> <sql>                     Register a virtual table with its defining SQL
  .drop <id>                         Remove a definition
  .change <id>                       Record a change to an object
  .list                              List registered objects
  .create <id>                       Show the CREATE TABLE statement for an object's index
  .columns <id> query|build [etag] [aggregate]
                                     Show the columns added to a generated SELECT
  .benefactors <id>                  Show benefactor columns
  .hash <id>                         Show the table hash
  .preprocess <id> <sql>             Rewrite a query against an object
  .filter <mainType> <scope> <subTypes> [ids...]
                                     Compile a view filter; scope is one of
                                     hierarchical, flat, pairs, refs
  .help                              Show this help message
  .quit                              Exit";

/// Run one line of input against the index
pub fn execute(index: &ReplicaIndex, line: &str) -> Result<Outcome> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let output = match command {
        ".quit" | ".exit" | ".q" => return Ok(Outcome::Quit),
        ".help" | ".h" => HELP.to_string(),

        ".table" => {
            let id = parse_id(&args, 0)?;
            index.catalog().create_table(id)?;
            format!("Registered table {}", id)
        }
        ".view" => {
            let id = parse_id(&args, 0)?;
            let kind: TableType = arg(&args, 1, "kind")?.parse()?;
            index.catalog().create_view(id, kind)?;
            format!("Registered {} {}", kind, id)
        }
        ".mv" => {
            let id = parse_id(&args, 0)?;
            let sources = args[1..]
                .iter()
                .map(|s| s.parse::<IdAndVersion>())
                .collect::<Result<Vec<_>>>()?;
            if sources.is_empty() {
                return Err(Error::required("sources"));
            }
            index.catalog().create_materialized_view(id, sources)?;
            format!("Registered materialized view {}", id)
        }
        ".vt" => {
            let id = parse_id(&args, 0)?;
            let sql = rest_after(rest, 1);
            index.catalog().create_virtual_table(id, sql)?;
            format!("Registered virtual table {}", id)
        }
        ".drop" => {
            let id = parse_id(&args, 0)?;
            index.catalog().drop_object(&id)?;
            format!("Dropped {}", id)
        }
        ".change" => {
            let id = parse_id(&args, 0)?;
            let change_number = index.catalog().record_change(&id)?;
            format!("{} last change: {}", id, change_number)
        }
        ".list" => {
            let catalog = index.catalog();
            catalog
                .list_objects()
                .into_iter()
                .filter_map(|id| {
                    let definition = catalog.get_definition(&id)?;
                    let change = catalog
                        .get_last_change_number(&id)
                        .map_or_else(|| "-".to_string(), |n| n.to_string());
                    Some(format!("  {}\t{}\t{}", id, definition.table_type(), change))
                })
                .collect::<Vec<_>>()
                .join("\n")
        }

        ".create" => index.create_index_sql(&parse_id(&args, 0)?)?,
        ".columns" => {
            let id = parse_id(&args, 0)?;
            let context = match arg(&args, 1, "context")?.to_lowercase().as_str() {
                "query" => SqlContext::Query,
                "build" => SqlContext::Build,
                other => {
                    return Err(Error::InvalidArgument(format!(
                        "Unknown SQL context: {}",
                        other
                    )))
                }
            };
            let flags = &args[2..];
            let include_etag = flags.iter().any(|f| f.eq_ignore_ascii_case("etag"));
            let is_aggregate = flags.iter().any(|f| f.eq_ignore_ascii_case("aggregate"));
            index
                .select_columns(&id, context, include_etag, is_aggregate)?
                .into_iter()
                .map(|column| format!("  {}\t{}", column.owner, column.sql))
                .collect::<Vec<_>>()
                .join("\n")
        }
        ".benefactors" => index
            .benefactors(&parse_id(&args, 0)?)?
            .into_iter()
            .map(|b| format!("  {}\t{}", b.column_name, b.object_type))
            .collect::<Vec<_>>()
            .join("\n"),
        ".hash" => index.table_hash(&parse_id(&args, 0)?)?,
        ".preprocess" => {
            let id = parse_id(&args, 0)?;
            index.preprocess_query(&id, rest_after(rest, 1))?
        }
        ".filter" => compile_filter(&args)?,

        _ => {
            return Err(Error::InvalidArgument(format!(
                "Unknown command: {}. Type .help for available commands.",
                command
            )))
        }
    };
    Ok(Outcome::Output(output))
}

fn arg<'a>(args: &[&'a str], position: usize, name: &str) -> Result<&'a str> {
    args.get(position).copied().ok_or_else(|| Error::required(name))
}

fn parse_id(args: &[&str], position: usize) -> Result<IdAndVersion> {
    arg(args, position, "id")?.parse()
}

/// The raw text after the first `skip` whitespace-separated words
fn rest_after(rest: &str, skip: usize) -> &str {
    let mut remaining = rest;
    for _ in 0..skip {
        remaining = remaining
            .trim_start()
            .split_once(char::is_whitespace)
            .map_or("", |(_, tail)| tail);
    }
    remaining.trim()
}

fn compile_filter(args: &[&str]) -> Result<String> {
    let main_type: ReplicationType = arg(args, 0, "mainType")?.parse()?;
    let scope_kind = arg(args, 1, "scope")?.to_lowercase();
    let sub_types = arg(args, 2, "subTypes")?
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<SubType>())
        .collect::<Result<Vec<_>>>()?;
    let refs = args[3..]
        .iter()
        .map(|s| s.parse::<IdAndVersion>())
        .collect::<Result<Vec<_>>>()?;

    let scope = match scope_kind.as_str() {
        "hierarchical" => FilterScope::Hierarchical {
            parent_ids: refs.iter().map(|r| r.id).collect(),
        },
        "flat" => FilterScope::FlatIds {
            scope: refs.iter().map(|r| r.id).collect(),
        },
        "pairs" => FilterScope::FlatIdAndVersion {
            scope: refs
                .iter()
                .map(|r| {
                    r.version.map(|version| (r.id, version)).ok_or_else(|| {
                        Error::InvalidArgument(format!("{} has no version", r))
                    })
                })
                .collect::<Result<BTreeSet<_>>>()?,
        },
        "refs" => FilterScope::from_refs(refs),
        other => {
            return Err(Error::InvalidArgument(format!(
                "Unknown filter scope: {}",
                other
            )))
        }
    };

    let filter = ViewFilter::new(main_type, sub_types, scope)?;
    let params = serde_json::to_string(&filter.get_parameters())
        .map_err(|e| Error::InvalidArgument(e.to_string()))?;
    Ok(format!("{}\n{}", filter.get_filter_sql(), params))
}
