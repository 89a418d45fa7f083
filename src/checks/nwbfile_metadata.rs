//! Checks over general session metadata: the file itself, its subject and
//! processing modules.

use super::registry::CheckRegistry;
use super::trait_def::{CheckDescriptor, Finding, Importance};
use crate::core::error::InspectorResult;
use crate::model::neurodata::{NWB_FILE, PROCESSING_MODULE, SUBJECT};
use crate::model::{NwbFile, ProcessingModule, Subject};
use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

const DURATION_PATTERN: &str = r"^P(\d+(\.\d+)?Y)?(\d+(\.\d+)?M)?(\d+(\.\d+)?W)?(\d+(\.\d+)?D)?(T(\d+(\.\d+)?H)?(\d+(\.\d+)?M)?(\d+(\.\d+)?S)?)?$";
const SPECIES_PATTERN: &str = r"^[A-Z][a-z]* [a-z]+$";
const EXPERIMENTER_PATTERN: &str = r"^(.*:)?([^0-9]+),\s([^0-9]+)(\s[^0-9]+)?$";

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static DURATION: Pattern = LazyLock::new(|| Regex::new(DURATION_PATTERN));
static SPECIES: Pattern = LazyLock::new(|| Regex::new(SPECIES_PATTERN));
static EXPERIMENTER: Pattern = LazyLock::new(|| Regex::new(EXPERIMENTER_PATTERN));

const PROCESSING_MODULE_NAMES: [&str; 7] = ["ophys", "ecephys", "icephys", "behavior", "misc", "ogen", "retinotopy"];
const DOI_PREFIXES: [&str; 3] = ["doi:", "http://dx.doi.org/", "https://doi.org/"];

pub fn register(registry: &mut CheckRegistry) -> InspectorResult<()> {
  use Importance::{BestPracticeSuggestion, Critical};

  let checks = [
    CheckDescriptor::new(
      "check_session_start_time_old_date",
      &NWB_FILE,
      BestPracticeSuggestion,
      check_session_start_time_old_date,
    )
    .with_description("session_start_time is before 1980"),
    CheckDescriptor::new(
      "check_session_start_time_future_date",
      &NWB_FILE,
      Critical,
      check_session_start_time_future_date,
    )
    .with_description("session_start_time is in the future"),
    CheckDescriptor::new("check_experimenter", &NWB_FILE, BestPracticeSuggestion, check_experimenter)
      .with_description("an experimenter is listed"),
    CheckDescriptor::new(
      "check_experimenter_form",
      &NWB_FILE,
      BestPracticeSuggestion,
      check_experimenter_form,
    )
    .with_description("experimenters are written 'Last, First M.'"),
    CheckDescriptor::new(
      "check_experiment_description",
      &NWB_FILE,
      BestPracticeSuggestion,
      check_experiment_description,
    )
    .with_description("an experiment description is present"),
    CheckDescriptor::new("check_institution", &NWB_FILE, BestPracticeSuggestion, check_institution)
      .with_description("the institution is present"),
    CheckDescriptor::new("check_keywords", &NWB_FILE, BestPracticeSuggestion, check_keywords)
      .with_description("keywords are present"),
    CheckDescriptor::new("check_subject_exists", &NWB_FILE, BestPracticeSuggestion, check_subject_exists)
      .with_description("a subject is present"),
    CheckDescriptor::new(
      "check_doi_publications",
      &NWB_FILE,
      BestPracticeSuggestion,
      check_doi_publications,
    )
    .with_description("related publications are DOIs"),
    CheckDescriptor::new("check_subject_age", &SUBJECT, BestPracticeSuggestion, check_subject_age)
      .with_description("subject age is an ISO 8601 duration"),
    CheckDescriptor::new("check_subject_id_exists", &SUBJECT, BestPracticeSuggestion, check_subject_id_exists)
      .with_description("subject_id is present"),
    CheckDescriptor::new("check_subject_sex", &SUBJECT, BestPracticeSuggestion, check_subject_sex)
      .with_description("subject sex is one of M, F, O, U"),
    CheckDescriptor::new("check_subject_species", &SUBJECT, BestPracticeSuggestion, check_subject_species)
      .with_description("subject species is a latin binomial"),
    CheckDescriptor::new(
      "check_processing_module_name",
      &PROCESSING_MODULE,
      BestPracticeSuggestion,
      check_processing_module_name,
    )
    .with_description("processing modules use schema names"),
  ];

  for check in checks {
    registry.register(check)?;
  }
  Ok(())
}

/// Compiled pattern; a pattern that failed to compile fails the check using it
fn compiled(pattern: &'static Pattern) -> anyhow::Result<&'static Regex> {
  pattern.as_ref().map_err(|err| err.clone().into())
}

fn is_blank(value: Option<&String>) -> bool {
  value.is_none_or(|v| v.trim().is_empty())
}

fn old_date_cutoff() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn start_time(nwbfile: &NwbFile) -> Option<DateTime<Utc>> {
  nwbfile.session_start_time.map(|start| start.with_timezone(&Utc))
}

fn check_session_start_time_old_date(nwbfile: &NwbFile) -> Option<Finding> {
  let start = start_time(nwbfile)?;
  (start < old_date_cutoff()).then(|| {
    Finding::new(format!(
      "The session_start_time ({}) may not be set to the true date of the recording.",
      start
    ))
  })
}

fn check_session_start_time_future_date(nwbfile: &NwbFile) -> Option<Finding> {
  let start = start_time(nwbfile)?;
  (start >= Utc::now()).then(|| {
    Finding::new(format!(
      "The session_start_time ({}) is set to a future date and time.",
      start
    ))
  })
}

fn check_experimenter(nwbfile: &NwbFile) -> Option<Finding> {
  nwbfile
    .experimenter
    .is_empty()
    .then(|| Finding::new("Experimenter is missing."))
}

fn check_experimenter_form(nwbfile: &NwbFile) -> anyhow::Result<Vec<Finding>> {
  let pattern = compiled(&EXPERIMENTER)?;
  Ok(
    nwbfile
      .experimenter
      .iter()
      .filter(|name| !pattern.is_match(name))
      .map(|name| {
        Finding::new(format!(
          "Experimenter '{}' is not of the correct form. It should be either 'Lastname, Firstname' or \
           'Lastname, Firstname M.I.' where M. I. are the middle initials. A role may precede the name as \
           'Role: ', e.g. 'Author: Doe, Jane E.' or 'Lab Tech: Doe, John Michael'.",
          name
        ))
      })
      .collect(),
  )
}

fn check_experiment_description(nwbfile: &NwbFile) -> Option<Finding> {
  is_blank(nwbfile.experiment_description.as_ref()).then(|| Finding::new("Experiment description is missing."))
}

fn check_institution(nwbfile: &NwbFile) -> Option<Finding> {
  is_blank(nwbfile.institution.as_ref()).then(|| Finding::new("Metadata /general/institution is missing."))
}

fn check_keywords(nwbfile: &NwbFile) -> Option<Finding> {
  nwbfile
    .keywords
    .is_empty()
    .then(|| Finding::new("Metadata /general/keywords is missing."))
}

fn check_subject_exists(nwbfile: &NwbFile) -> Option<Finding> {
  nwbfile.subject.is_none().then(|| Finding::new("Subject is missing."))
}

fn check_doi_publications(nwbfile: &NwbFile) -> Vec<Finding> {
  nwbfile
    .related_publications
    .iter()
    .filter(|publication| !DOI_PREFIXES.iter().any(|prefix| publication.starts_with(prefix)))
    .map(|publication| {
      Finding::new(format!(
        "Metadata /general/related_publications '{}' does not start with 'doi: ###' or is not an external \
         'doi' link.",
        publication
      ))
    })
    .collect()
}

fn check_subject_age(subject: &Subject) -> anyhow::Result<Option<Finding>> {
  let Some(age) = &subject.age else {
    return Ok(
      subject
        .date_of_birth
        .is_none()
        .then(|| Finding::new("Subject is missing age and date_of_birth.")),
    );
  };

  let pattern = compiled(&DURATION)?;
  // "P" and "PT" match the pattern but carry no duration
  let empty = age == "P" || age.ends_with('T');
  Ok((empty || !pattern.is_match(age)).then(|| {
    Finding::new("Subject age does not follow ISO 8601 duration format, e.g. 'P2Y' for 2 years or 'P23W' for 23 weeks.")
  }))
}

fn check_subject_id_exists(subject: &Subject) -> Option<Finding> {
  subject.subject_id.is_none().then(|| Finding::new("subject_id is missing."))
}

fn check_subject_sex(subject: &Subject) -> Option<Finding> {
  match subject.sex.as_deref() {
    None | Some("") => Some(Finding::new("Subject.sex is missing.")),
    Some("M" | "F" | "O" | "U") => None,
    Some(_) => Some(Finding::new(
      "Subject.sex should be one of: 'M' (male), 'F' (female), 'O' (other), or 'U' (unknown).",
    )),
  }
}

fn check_subject_species(subject: &Subject) -> anyhow::Result<Option<Finding>> {
  let Some(species) = subject.species.as_deref().filter(|s| !s.is_empty()) else {
    return Ok(Some(Finding::new("Subject species is missing.")));
  };
  let pattern = compiled(&SPECIES)?;
  Ok((!pattern.is_match(species)).then(|| {
    Finding::new("Species should be in latin binomial form, e.g. 'Mus musculus' and 'Homo sapiens'")
  }))
}

fn check_processing_module_name(module: &ProcessingModule) -> Option<Finding> {
  (!PROCESSING_MODULE_NAMES.contains(&module.name.as_str())).then(|| {
    Finding::new(format!(
      "Processing module is named {}. It is recommended to use the schema module names: {}",
      module.name,
      PROCESSING_MODULE_NAMES.join(", ")
    ))
  })
}
