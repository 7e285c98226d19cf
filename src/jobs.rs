use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{StaffedPick, VoterPick};
use crate::store;

const UNKNOWN_JOB: &str = "Unknown";

/// Parses `category<TAB>name, name, ...` lines into a name to category map.
/// Blank lines and lines without a tab are ignored; later lines win.
pub fn parse_job_map(contents: &str) -> HashMap<String, String> {
    let mut jobs = HashMap::new();

    for line in contents.lines().map(str::trim) {
        let Some((category, names)) = line.split_once('\t') else {
            continue;
        };
        for name in names.split(',') {
            jobs.insert(name.trim().to_string(), category.to_string());
        }
    }

    jobs
}

/// Tags each pick with its voter's job category.
pub fn assign_jobs(picks: Vec<VoterPick>, jobs: &HashMap<String, String>) -> Vec<StaffedPick> {
    picks
        .into_iter()
        .map(|pick| StaffedPick {
            job: jobs
                .get(&pick.person)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_JOB.to_string()),
            person: pick.person,
            rank: pick.rank,
            title: pick.title,
            img_url: pick.img_url,
            uniqid: pick.uniqid,
        })
        .collect()
}

/// Adds a `job` column to a critics ballot CSV.
pub fn add_jobs(input: &Path, jobs_file: &Path, output: &Path) -> Result<usize> {
    let contents = std::fs::read_to_string(jobs_file)
        .with_context(|| format!("reading {}", jobs_file.display()))?;
    let jobs = parse_job_map(&contents);

    let picks: Vec<VoterPick> = store::read_rows(input)?;
    let staffed = assign_jobs(picks, &jobs);
    let unknown = staffed.iter().filter(|p| p.job == UNKNOWN_JOB).count();

    store::write_rows(output, &staffed)?;
    info!(
        "Wrote {} rows to {} ({} voters without a job)",
        staffed.len(),
        output.display(),
        unknown
    );

    Ok(staffed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(person: &str) -> VoterPick {
        VoterPick {
            person: person.to_string(),
            rank: 1,
            title: "Zodiac".to_string(),
            img_url: String::new(),
            uniqid: String::new(),
        }
    }

    #[test]
    fn job_map_parsing() {
        let jobs = parse_job_map(
            "Director\tSofia Coppola, Barry Jenkins\n\nno tab here\nActor\tJulianne Moore\nWriter\tBarry Jenkins\n",
        );

        assert_eq!(jobs["Sofia Coppola"], "Director");
        assert_eq!(jobs["Julianne Moore"], "Actor");
        assert_eq!(jobs["Barry Jenkins"], "Writer");
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn unlisted_voters_are_unknown() {
        let jobs = parse_job_map("Director\tSofia Coppola\n");
        let staffed = assign_jobs(vec![pick("Sofia Coppola"), pick("Anonymous")], &jobs);

        assert_eq!(staffed[0].job, "Director");
        assert_eq!(staffed[1].job, UNKNOWN_JOB);
    }

    #[test]
    fn writes_job_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("top100.csv");
        let jobs_file = dir.path().join("jobs.txt");
        let output = dir.path().join("with_jobs.csv");
        store::write_rows(&input, &[pick("Sofia Coppola")]).unwrap();
        std::fs::write(&jobs_file, "Director\tSofia Coppola\n").unwrap();

        assert_eq!(add_jobs(&input, &jobs_file, &output).unwrap(), 1);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "person,rank,title,img_url,uniqid,job\nSofia Coppola,1,Zodiac,,,Director\n"
        );
    }
}
