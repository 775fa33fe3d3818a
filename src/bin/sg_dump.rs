use sgindex::{formats, GraphIndex, Orientation};

use simple_sds::serialize;

use std::io::{BufWriter, Write};
use std::time::Instant;
use std::{env, io, process};

use getopts::Options;

//-----------------------------------------------------------------------------

fn main() -> Result<(), String> {
    let start = Instant::now();
    let config = Config::new()?;

    let filename = config.filename.as_ref().unwrap();
    if config.verbose {
        eprintln!("Loading index {}", filename);
    }
    let index: GraphIndex = serialize::load_from(filename).map_err(|x| x.to_string())?;

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    match &config.mode {
        Mode::Text => {
            formats::write_text(&index, &mut output).map_err(|x| x.to_string())?;
        },
        Mode::Statistics => {
            write_statistics(&index, &mut output).map_err(|x| x.to_string())?;
        },
        Mode::Paths => {
            write_paths(&index, &mut output).map_err(|x| x.to_string())?;
        },
        Mode::Threads => {
            write_threads(&index, &mut output).map_err(|x| x.to_string())?;
        },
        Mode::Region(region) => {
            write_region(&index, region, &mut output)?;
        },
    }
    output.flush().map_err(|x| x.to_string())?;

    if config.verbose {
        eprintln!("Finished in {:.3} seconds", start.elapsed().as_secs_f64());
    }
    Ok(())
}

//-----------------------------------------------------------------------------

enum Mode {
    Text,
    Statistics,
    Paths,
    Threads,
    Region(formats::Region),
}

struct Config {
    filename: Option<String>,
    mode: Mode,
    verbose: bool,
}

impl Config {
    pub fn new() -> Result<Config, String> {
        let args: Vec<String> = env::args().collect();
        let program = args[0].clone();

        let mut opts = Options::new();
        opts.optflag("h", "help", "print this help");
        opts.optflag("s", "statistics", "print index statistics");
        opts.optflag("p", "paths", "list the paths in the index");
        opts.optflag("t", "threads", "extract the stored threads");
        opts.optopt("r", "region", "print the nodes covering a path region", "NAME[:START[-END]]");
        opts.optflag("v", "verbose", "print progress information");
        let matches = opts.parse(&args[1..]).map_err(|x| x.to_string())?;

        let mut config = Config {
            filename: None,
            mode: Mode::Text,
            verbose: false,
        };
        if matches.opt_present("h") {
            let header = format!("Usage: {} [options] graph.sgi > graph.gfa", program);
            eprint!("{}", opts.usage(&header));
            process::exit(0);
        }
        if matches.opt_present("s") {
            config.mode = Mode::Statistics;
        }
        if matches.opt_present("p") {
            config.mode = Mode::Paths;
        }
        if matches.opt_present("t") {
            config.mode = Mode::Threads;
        }
        if let Some(s) = matches.opt_str("r") {
            config.mode = Mode::Region(formats::parse_region(&s)?);
        }
        if matches.opt_present("v") {
            config.verbose = true;
        }

        if !matches.free.is_empty() {
            config.filename = Some(matches.free[0].clone());
        } else {
            let header = format!("Usage: {} [options] graph.sgi > graph.gfa", program);
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        }

        Ok(config)
    }
}

//-----------------------------------------------------------------------------

fn write_statistics<T: Write>(index: &GraphIndex, output: &mut T) -> io::Result<()> {
    writeln!(output, "Nodes:     {}", index.node_count())?;
    writeln!(output, "Edges:     {}", index.edge_count())?;
    writeln!(output, "Sequence:  {} bp", index.sequence_len())?;
    writeln!(output, "Paths:     {}", index.path_count())?;
    writeln!(output, "Threads:   {} orientations", index.threads().stored_orientations())?;
    Ok(())
}

fn write_paths<T: Write>(index: &GraphIndex, output: &mut T) -> io::Result<()> {
    let paths = index.paths();
    for rank in 1..=paths.max_path_rank() {
        output.write_all(paths.path_name(rank))?;
        writeln!(output, "\t{} visits\t{} bp", paths.indexed_path(rank).visit_count(), paths.path_length(rank))?;
    }
    Ok(())
}

fn write_threads<T: Write>(index: &GraphIndex, output: &mut T) -> io::Result<()> {
    for thread in index.threads().extract_threads(index.graph()) {
        let mut line = String::new();
        for mapping in thread.iter() {
            line.push(if mapping.orientation == Orientation::Reverse { '<' } else { '>' });
            line.push_str(&mapping.id.to_string());
        }
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

fn write_region<T: Write>(index: &GraphIndex, region: &formats::Region, output: &mut T) -> Result<(), String> {
    let paths = index.paths();
    let path_rank = paths.path_rank(&region.name);
    if path_rank == 0 {
        return Err(format!("No path with name {}", region.name));
    }
    let path_len = paths.path_length(path_rank);
    let (start, end) = region.interval.unwrap_or((0, path_len.saturating_sub(1)));
    if start >= path_len {
        return Err(format!("Region starts past the end of path {}", region.name));
    }
    let end = end.min(path_len - 1);

    let indexed = paths.indexed_path(path_rank);
    let first = indexed.visit_at(start);
    let last = indexed.visit_at(end);
    for visit in first..=last {
        let traversal = indexed.traversal(visit);
        writeln!(output, "{}\t{}\t{}",
            traversal.id,
            indexed.position(visit),
            if traversal.orientation.is_reverse() { "-" } else { "+" },
        ).map_err(|x| x.to_string())?;
    }
    Ok(())
}

//-----------------------------------------------------------------------------
