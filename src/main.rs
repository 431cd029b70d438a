extern crate pretty_env_logger;

#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use clap::Parser;
use noodles_vcf::{self as vcf};
use std::io::Write;

use tarone::{
    Cli, Commands, CountsArgs, LocusArgs, LocusExtractor, LocusReader, LocusReport, LocusVcf,
    ReportWriter, TaroneParams,
};

fn main() -> Result<()> {
    let args = Cli::parse();
    let params: &dyn TaroneParams = match &args.command {
        Commands::Counts(sub) => sub,
        Commands::Locus(sub) => sub,
    };

    let level = if params.debug() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    info!("starting");
    info!("params: {:#?}", params);
    if !params.validate() {
        error!("please fix arguments");
        std::process::exit(1);
    }

    match &args.command {
        Commands::Counts(sub) => counts_main(sub)?,
        Commands::Locus(sub) => locus_main(sub)?,
    }

    info!("finished");
    Ok(())
}

/// Test counts given directly on the command line
fn counts_main(args: &CountsArgs) -> Result<()> {
    let result = match tarone::run(&args.trials, &args.successes) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if !result.z_statistic.is_finite() {
        warn!("z statistic is {}", result.z_statistic);
    }

    let mut out = std::io::stdout().lock();
    if args.test.json {
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;
    } else {
        writeln!(out, "pooled_proportion\tz_statistic\tp_value\toverdispersed")?;
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            result.pooled_proportion,
            result.z_statistic,
            result.p_value,
            result.is_overdispersed(args.test.min_z)
        )?;
    }
    Ok(())
}

/// Extract and test every alternate allele of the records at the requested loci
fn locus_main(args: &LocusArgs) -> Result<()> {
    let mut input_vcf = vcf::io::reader::Builder::default()
        .build_from_path(&args.io.input)
        .with_context(|| format!("Unable to open vcf {}", args.io.input.display()))?;
    let input_header = input_vcf
        .read_header()
        .context("Unable to parse vcf header")?;

    let header_samples: Vec<String> = input_header.sample_names().iter().cloned().collect();
    if header_samples.is_empty() {
        error!("--input contains no samples");
        std::process::exit(1);
    }

    let extractor = LocusExtractor::new(
        &header_samples,
        args.io.samples.as_deref(),
        &args.fields.depth_field,
        &args.fields.alt_field,
    )?;
    info!(
        "testing {} of {} samples",
        extractor.sample_names().count(),
        header_samples.len()
    );

    let mut writer = ReportWriter::new(&args.io.output, args.test.json)
        .context("Unable to create output")?;

    let mut m_input = LocusReader::new(input_vcf, input_header, args.loci(), args.io.passonly);
    for record in &mut m_input {
        let chrom = record.reference_sequence_name().to_string();
        let pos = record.position();

        let alleles = match extractor.extract(&record) {
            Ok(a) => a,
            Err(e) => {
                warn!("skipping {}:{} {}", chrom, pos, e);
                continue;
            }
        };

        for allele in alleles {
            let result = allele.observations.tarone();
            if let Err(e) = &result {
                warn!("{}:{} {} {}", chrom, pos, allele.alt_allele, e);
            }
            let report = LocusReport::new(
                &chrom,
                pos,
                record.reference_bases(),
                &allele,
                result.as_ref().map_err(|e| e.to_string()),
                args.test.min_z,
            );
            writer.write(&report)?;
        }
    }

    if let Some(e) = m_input.error.take() {
        return Err(e).with_context(|| {
            format!(
                "Unable to read vcf {} after {} records",
                args.io.input.display(),
                m_input.read_count
            )
        });
    }

    for (locus, hits) in m_input.loci_hits() {
        if hits == 0 {
            warn!("no record at {}", locus);
        }
    }

    info!(
        "{} alleles tested, {} overdispersed (z > {})",
        writer.written, writer.overdispersed, args.test.min_z
    );
    writer.finish()?;
    Ok(())
}
