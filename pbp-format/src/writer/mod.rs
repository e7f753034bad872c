//! Implements the writing of pseudo-Boolean proofs.
//!
//! See [`ProofWriter`] for more information on how to write proofs.

use std::fmt::Display;
use std::io::BufWriter;
use std::io::Write;

use crate::steps::Closing;
use crate::steps::Comment;
use crate::steps::FormulaConstraint;
use crate::steps::LoadFormula;
use crate::steps::PolItem;
use crate::steps::Polynomial;
use crate::steps::Redundance;
use crate::steps::ReverseUnitPropagation;
use crate::steps::PROOF_VERSION;
use crate::Constraint;
use crate::Term;

/// Abstraction for writing pseudo-Boolean proofs.
///
/// Apart from complete steps, a redundance step can be streamed: it is opened with
/// [`ProofWriter::begin_redundance`], receives its terms in any number of
/// [`ProofWriter::append_terms`] calls, and is closed with [`ProofWriter::finish_redundance`].
///
/// # Example
/// ```
/// # use pbp_format::writer::ProofWriter;
/// # use pbp_format::Constraint;
/// # use pbp_format::Literal;
/// let mut proof: Vec<u8> = Vec::new();
/// let mut writer = ProofWriter::new(&mut proof);
///
/// let definition = Constraint::new(1)
///     .with_term(1, Literal::positive("r"))
///     .with_term(1, Literal::negative("x"));
/// writer.log_comment("r is implied by x").unwrap();
/// writer
///     .log_redundance(Some("r_Lreif"), &definition, &[("r", true)])
///     .unwrap();
/// writer
///     .log_rup(None::<&str>, &Constraint::clause([Literal::positive("r")]))
///     .unwrap();
/// writer.conclude().unwrap();
///
/// let expected = "
/// * r is implied by x
/// @r_Lreif red 1 r 1 ~x >= 1 ; r -> 1
/// rup 1 r >= 1 ;
/// output NONE
/// conclusion NONE
/// end pseudo-Boolean proof
/// ";
/// assert_eq!(std::str::from_utf8(&proof).unwrap(), expected.trim_start());
/// ```
#[derive(Debug)]
pub struct ProofWriter<W: Write> {
    /// The writer to the underlying sink.
    writer: BufWriter<W>,
    /// Whether a streamed redundance step has been opened but not finished.
    open_step: bool,
}

impl<W: Write> ProofWriter<W> {
    /// Create a new proof writer which writes the proof to an underlying sink implementing
    /// [`Write`].
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            open_step: false,
        }
    }

    /// Write the version line which opens a proof.
    pub fn log_header(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "pseudo-Boolean proof version {PROOF_VERSION}")
    }

    /// Load the formula, optionally stating how many constraints it has.
    pub fn log_load_formula(&mut self, num_constraints: Option<u64>) -> std::io::Result<()> {
        LoadFormula { num_constraints }.write_string(&mut self.writer)
    }

    pub fn log_comment(&mut self, text: impl Display) -> std::io::Result<()> {
        Comment { text }.write_string(&mut self.writer)
    }

    /// Write a redundance-based strengthening step.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_redundance<Name: Display>(
        &mut self,
        label: Option<impl Display>,
        constraint: &Constraint<Name>,
        witness: &[(Name, bool)],
    ) -> std::io::Result<()> {
        Redundance {
            label,
            constraint,
            witness,
        }
        .write_string(&mut self.writer)
    }

    /// Write a reverse unit propagation step.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_rup<Name: Display>(
        &mut self,
        label: Option<impl Display>,
        constraint: &Constraint<Name>,
    ) -> std::io::Result<()> {
        ReverseUnitPropagation { label, constraint }.write_string(&mut self.writer)
    }

    /// Write a derivation in polish notation.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_pol<Label: Display>(
        &mut self,
        label: Option<impl Display>,
        items: &[PolItem<Label>],
    ) -> std::io::Result<()> {
        Polynomial { label, items }.write_string(&mut self.writer)
    }

    /// Write a constraint of the formula.
    pub fn log_constraint<Name: Display>(
        &mut self,
        constraint: &Constraint<Name>,
    ) -> std::io::Result<()> {
        FormulaConstraint { constraint }.write_string(&mut self.writer)
    }

    /// Open a redundance step whose terms are supplied later on.
    pub fn begin_redundance(&mut self, label: impl Display) -> std::io::Result<()> {
        assert!(!self.open_step, "a streamed step is already open");
        self.open_step = true;
        write!(self.writer, "@{label} red")
    }

    /// Add terms to the currently open redundance step.
    pub fn append_terms<Name: Display>(&mut self, terms: &[Term<Name>]) -> std::io::Result<()> {
        assert!(self.open_step, "no streamed step is open");
        for term in terms {
            write!(self.writer, " {term}")?;
        }
        Ok(())
    }

    /// Close the currently open redundance step with its final terms, degree and witness.
    pub fn finish_redundance<Name: Display>(
        &mut self,
        terms: &[Term<Name>],
        degree: i64,
        witness: &[(Name, bool)],
    ) -> std::io::Result<()> {
        self.append_terms(terms)?;
        self.open_step = false;
        write!(self.writer, " >= {degree} ;")?;
        write_witness(&mut self.writer, witness)?;
        writeln!(self.writer)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Write the closing section of the proof.
    ///
    /// Since the closing section is the very last part of the proof, this method takes ownership
    /// of [`Self`], to ensure no more steps can be written after it.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn conclude(mut self) -> std::io::Result<()> {
        for closing in [Closing::Output, Closing::Conclusion, Closing::End] {
            closing.write_string(&mut self.writer)?;
        }
        self.writer.flush()
    }
}

fn write_witness<Name: Display>(
    sink: &mut impl Write,
    witness: &[(Name, bool)],
) -> std::io::Result<()> {
    for (name, value) in witness {
        write!(sink, " {name} -> {}", u8::from(*value))?;
    }
    Ok(())
}

fn write_label(sink: &mut impl Write, label: Option<impl Display>) -> std::io::Result<()> {
    if let Some(label) = label {
        write!(sink, "@{label} ")?;
    }
    Ok(())
}

trait WritableProofStep: Sized {
    /// Write the proof step in the string form.
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()>;
}

impl<Text: Display> WritableProofStep for Comment<Text> {
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        writeln!(sink, "* {}", self.text)
    }
}

impl WritableProofStep for LoadFormula {
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        match self.num_constraints {
            Some(count) => writeln!(sink, "f {count}"),
            None => writeln!(sink, "f"),
        }
    }
}

impl<Name: Display, Label: Display> WritableProofStep
    for Redundance<Label, &Constraint<Name>, &[(Name, bool)]>
{
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        write_label(sink, self.label)?;
        write!(sink, "red {} ;", self.constraint)?;
        write_witness(sink, self.witness)?;
        writeln!(sink)
    }
}

impl<Name: Display, Label: Display> WritableProofStep
    for ReverseUnitPropagation<Label, &Constraint<Name>>
{
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        write_label(sink, self.label)?;
        writeln!(sink, "rup {} ;", self.constraint)
    }
}

impl<Label: Display, ItemLabel: Display> WritableProofStep
    for Polynomial<Label, &[PolItem<ItemLabel>]>
{
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        write_label(sink, self.label)?;
        write!(sink, "pol")?;

        for item in self.items {
            match item {
                PolItem::Step(label) => write!(sink, " @{label}")?,
                PolItem::ConstraintId(id) => write!(sink, " {id}")?,
                PolItem::Add => write!(sink, " +")?,
                PolItem::Multiply(factor) => write!(sink, " {factor} *")?,
                PolItem::Divide(divisor) => write!(sink, " {divisor} d")?,
                PolItem::Saturate => write!(sink, " s")?,
            }
        }

        writeln!(sink, " ;")
    }
}

impl<Name: Display> WritableProofStep for FormulaConstraint<&Constraint<Name>> {
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        writeln!(sink, "{} ;", self.constraint)
    }
}

impl WritableProofStep for Closing {
    fn write_string(self, sink: &mut impl Write) -> std::io::Result<()> {
        match self {
            Closing::Output => writeln!(sink, "output NONE"),
            Closing::Conclusion => writeln!(sink, "conclusion NONE"),
            Closing::End => writeln!(sink, "end pseudo-Boolean proof"),
        }
    }
}
