use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::jobs::JobPosting;
use crate::pipeline::{pad_jobs, CompanyResult};

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS company_results (
            id               INTEGER PRIMARY KEY,
            run_id           TEXT NOT NULL,
            company_name     TEXT NOT NULL,
            website_url      TEXT NOT NULL,
            linkedin_url     TEXT NOT NULL,
            careers_url      TEXT NOT NULL,
            jobs_listing_url TEXT NOT NULL,
            provider         TEXT NOT NULL,
            job1_url TEXT NOT NULL, job1_title TEXT NOT NULL, job1_location TEXT NOT NULL, job1_date TEXT NOT NULL,
            job2_url TEXT NOT NULL, job2_title TEXT NOT NULL, job2_location TEXT NOT NULL, job2_date TEXT NOT NULL,
            job3_url TEXT NOT NULL, job3_title TEXT NOT NULL, job3_location TEXT NOT NULL, job3_date TEXT NOT NULL,
            processed_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_results_company ON company_results(company_name);
        CREATE INDEX IF NOT EXISTS idx_results_provider ON company_results(provider);
        ",
    )?;
    Ok(())
}

// ── Results ──

/// Appends one batch. Earlier rows for the same company are kept.
pub fn insert_results(conn: &Connection, run_id: &str, results: &[CompanyResult]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO company_results
             (run_id, company_name, website_url, linkedin_url, careers_url, jobs_listing_url, provider,
              job1_url, job1_title, job1_location, job1_date,
              job2_url, job2_title, job2_location, job2_date,
              job3_url, job3_title, job3_location, job3_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        )?;
        for r in results {
            let jobs = pad_jobs(r.jobs.clone());
            count += stmt.execute(rusqlite::params![
                run_id,
                r.company_name, r.website_url, r.linkedin_url, r.careers_url, r.jobs_listing_url, r.provider,
                jobs[0].url, jobs[0].title, jobs[0].location, jobs[0].posted_date,
                jobs[1].url, jobs[1].title, jobs[1].location, jobs[1].posted_date,
                jobs[2].url, jobs[2].title, jobs[2].location, jobs[2].posted_date,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Every stored result, oldest first.
pub fn fetch_results(conn: &Connection) -> Result<Vec<CompanyResult>> {
    let mut stmt = conn.prepare(
        "SELECT company_name, website_url, linkedin_url, careers_url, jobs_listing_url, provider,
                job1_url, job1_title, job1_location, job1_date,
                job2_url, job2_title, job2_location, job2_date,
                job3_url, job3_title, job3_location, job3_date
         FROM company_results ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let mut jobs = Vec::new();
            for slot in 0..3 {
                let base = 6 + slot * 4;
                jobs.push(JobPosting {
                    url: row.get(base)?,
                    title: row.get(base + 1)?,
                    location: row.get(base + 2)?,
                    posted_date: row.get(base + 3)?,
                });
            }
            Ok(CompanyResult {
                company_name: row.get(0)?,
                website_url: row.get(1)?,
                linkedin_url: row.get(2)?,
                careers_url: row.get(3)?,
                jobs_listing_url: row.get(4)?,
                provider: row.get(5)?,
                jobs,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: i64,
    pub runs: i64,
    pub with_website: i64,
    pub with_careers: i64,
    pub with_jobs: i64,
    pub providers: Vec<(String, i64)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };

    let mut stmt = conn.prepare(
        "SELECT provider, COUNT(*) FROM company_results
         WHERE provider != ''
         GROUP BY provider ORDER BY COUNT(*) DESC, provider",
    )?;
    let providers = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Stats {
        total: count("SELECT COUNT(*) FROM company_results")?,
        runs: count("SELECT COUNT(DISTINCT run_id) FROM company_results")?,
        with_website: count("SELECT COUNT(*) FROM company_results WHERE website_url != ''")?,
        with_careers: count("SELECT COUNT(*) FROM company_results WHERE careers_url != ''")?,
        with_jobs: count("SELECT COUNT(*) FROM company_results WHERE job1_url != ''")?,
        providers,
    })
}
