mod os_signal_termination;
mod result;

use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::ExitCode;
use result::SproutError;
use result::SproutResult;
use sprout_solver::components::ComponentSpec;
use sprout_solver::components::PatternSpec;
use sprout_solver::components::SearchConfiguration;
use sprout_solver::convert_case::Case;
use sprout_solver::evaluation::INFINITY;
use sprout_solver::pdbs::GreedyPatternOptions;
use sprout_solver::pdbs::PdbOptions;
use sprout_solver::proof::ProofSession;
use sprout_solver::sas;
use sprout_solver::search::termination::Combinator;
use sprout_solver::search::termination::TimeBudget;
use sprout_solver::search::EagerSearchOptions;
use sprout_solver::search::PlanWriter;
use sprout_solver::search::SearchStatus;
use sprout_solver::statistics::configure_statistic_logging;
use sprout_solver::statistics::log_statistic_postfix;
use sprout_solver::task::AbstractTask;
use sprout_solver::task::OperatorCost;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The task to solve, in the SAS format written by the translator (usually `output.sas`).
    task_path: PathBuf,

    /// The search algorithm.
    ///
    /// - "astar" orders the open list by g + h and finds optimal plans with an admissible
    ///   heuristic
    /// - "wastar" orders the open list by g + w * h, see "--weight"
    /// - "greedy" orders the open list by h alone
    /// - "pareto" expands a random node among those which no other node beats on both g and h,
    ///   see "--random-seed"
    #[arg(long, value_enum, default_value_t, verbatim_doc_comment)]
    search: SearchType,

    /// The heuristic which guides the search.
    ///
    /// - "blind" estimates 0 for goal states and the cheapest operator cost otherwise
    /// - "pdb" uses a single pattern database, see "--pattern" and "--max-states"
    /// - "combo" takes the maximum over a greedy pattern and singleton patterns of the remaining
    ///   goal variables
    /// - "lmsum" sums the cheapest achievers of the unsatisfied goal landmarks; it is not
    ///   admissible
    #[arg(long, value_enum, default_value_t, verbatim_doc_comment)]
    heuristic: HeuristicType,

    /// The variables of the pattern of the "pdb" heuristic, separated by commas.
    ///
    /// If no pattern is given, one is chosen greedily within "--max-states".
    ///
    /// Possible values: usize,usize,...
    #[arg(long, value_delimiter = ',', verbatim_doc_comment)]
    pattern: Vec<usize>,

    /// The maximum number of abstract states of a greedily chosen pattern.
    ///
    /// Possible values: usize
    #[arg(long, default_value_t = 1_000_000, verbatim_doc_comment)]
    max_states: usize,

    /// The weight of the heuristic in weighted A*.
    ///
    /// Possible values: i32 (positive)
    #[arg(short = 'w', long, default_value_t = 1, verbatim_doc_comment)]
    weight: i32,

    /// Only plans whose cost is strictly below the bound are searched for.
    ///
    /// Possible values: i32 (Optional)
    #[arg(short = 'b', long, verbatim_doc_comment)]
    bound: Option<i32>,

    /// Put closed nodes back on the open list when a cheaper path to them is found.
    ///
    /// Possible values: bool
    #[arg(long = "reopen-closed", verbatim_doc_comment)]
    reopen_closed: bool,

    /// How operator costs are interpreted for the g values of the search.
    #[arg(long, value_enum, default_value_t)]
    cost_type: OperatorCost,

    /// The time budget for the planner, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The random seed for the tie-breaking between equivalent operators of abstract plans, and
    /// for the choices of the "pareto" search.
    ///
    /// Possible values: u64
    #[arg(
        short = 'r',
        long = "random-seed",
        default_value_t = 42,
        verbatim_doc_comment
    )]
    random_seed: u64,

    /// Extract an optimal abstract plan for every pattern database and log it with "--verbose".
    ///
    /// Possible values: bool
    #[arg(long, verbatim_doc_comment)]
    extract_abstract_plan: bool,

    /// Report every step of an extracted abstract plan as all its equivalent operators.
    ///
    /// Possible values: bool
    #[arg(long, verbatim_doc_comment)]
    wildcard_plan: bool,

    /// The directory in which the certificate of optimality is written.
    ///
    /// The directory receives `task.opb`, the encoding of the task, and `plan.pbp`, the proof
    /// which shows that no cheaper plan exists. Certificates are only available for A* with
    /// the "blind", "pdb" and "combo" heuristics and normal operator costs.
    #[arg(long, verbatim_doc_comment)]
    proof_dir: Option<PathBuf>,

    /// Also write a gzipped copy of the assembled proof.
    ///
    /// If the "proof-dir" option is not provided, this is ignored.
    #[arg(long)]
    compress_proof: bool,

    /// The file to which the plan is written.
    #[arg(long, default_value = "sas_plan")]
    plan_file: PathBuf,

    /// Enables debug output, such as the construction of the search components.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Only log warnings and errors.
    ///
    /// Possible values: bool
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose", verbatim_doc_comment)]
    quiet: bool,

    /// Enables logging of statistics from the planner.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SearchType {
    #[default]
    Astar,
    Wastar,
    Greedy,
    Pareto,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HeuristicType {
    Blind,
    #[default]
    Pdb,
    Combo,
    Lmsum,
}

fn configure_logging(verbose: bool, quiet: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging(
            "%%%sprout-stat:",
            Some("%%%sprout-stat-end"),
            Some(Case::Camel),
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "{}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
}

fn main() {
    let exit_code = match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("Execution failed, error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(exit_code.code());
}

fn run() -> SproutResult<ExitCode> {
    let args = Args::parse();

    configure_logging(args.verbose, args.quiet, args.log_statistics);

    if sprout_solver::asserts::SPROUT_ASSERT_LEVEL_DEFINITION
        >= sprout_solver::asserts::SPROUT_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the Sprout assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            sprout_solver::asserts::SPROUT_ASSERT_LEVEL_DEFINITION
        );
    };

    let time_budget = args
        .time_limit
        .map(|limit| TimeBudget::starting_now(Duration::from_millis(limit)));
    let termination = Combinator::new(OsSignal::install()?, time_budget);

    let task: Rc<dyn AbstractTask> = Rc::new(sas::read_task_file(&args.task_path)?);
    info!(
        "Read a task with {} variables, {} operators and {} axioms.",
        task.num_variables(),
        task.num_operators(),
        task.axioms().len()
    );

    let heuristic = match args.heuristic {
        HeuristicType::Blind => ComponentSpec::Blind,
        HeuristicType::Pdb if args.pattern.is_empty() => {
            ComponentSpec::Pdb(PatternSpec::Greedy(GreedyPatternOptions {
                max_states: args.max_states,
            }))
        }
        HeuristicType::Pdb => ComponentSpec::Pdb(PatternSpec::Manual(args.pattern.clone())),
        HeuristicType::Combo => ComponentSpec::ComboPdbs(GreedyPatternOptions {
            max_states: args.max_states,
        }),
        HeuristicType::Lmsum => ComponentSpec::LandmarkSum,
    };

    let options = EagerSearchOptions {
        reopen_closed: args.reopen_closed,
        bound: args.bound.unwrap_or(INFINITY),
        cost_type: args.cost_type,
    };
    let configuration = match args.search {
        SearchType::Astar => SearchConfiguration::astar(heuristic, options),
        SearchType::Wastar => SearchConfiguration::wastar(heuristic, args.weight, options),
        SearchType::Greedy => SearchConfiguration::eager_greedy(heuristic, options),
        SearchType::Pareto => {
            SearchConfiguration::eager_pareto(heuristic, args.random_seed, options)
        }
    }
    .with_pdb_options(PdbOptions {
        extract_abstract_plan: args.extract_abstract_plan,
        wildcard_plan: args.wildcard_plan,
        random_seed: args.random_seed,
    });

    let proof = match args.proof_dir.as_ref() {
        Some(directory) => {
            if args.search != SearchType::Astar {
                return Err(SproutError::ProofGenerationNotSupported(format!(
                    "{:?} search",
                    args.search
                )));
            }
            if args.heuristic == HeuristicType::Lmsum {
                return Err(SproutError::ProofGenerationNotSupported(
                    "the landmark sum heuristic".to_owned(),
                ));
            }
            if let Some(bound) = args.bound {
                return Err(SproutError::ProofGenerationNotSupported(format!(
                    "the cost bound {bound}"
                )));
            }
            ProofSession::create(directory, task.as_ref())?.with_compression(args.compress_proof)
        }
        None => ProofSession::default(),
    };

    let mut search = configuration.build(Rc::clone(&task), proof)?;
    let status = search.search(termination);
    search.log_statistics();
    log_statistic_postfix();

    if status == SearchStatus::Solved {
        if let Some(plan) = search.plan() {
            let _ = PlanWriter::new(&args.plan_file).save_plan(plan, task.as_ref())?;
        }
        if let Some(path) = search.finalize_proof()? {
            info!("The certificate of optimality is written to {}", path.display());
        }
    }

    Ok(ExitCode::for_status(status, args.bound.is_some()))
}
