use std::{fs, io::BufWriter, path::Path};

use log::info;

use crate::stats::{
    RecordSet, SignConvention, StatRow, StatsError,
    table::{read_table, write_table},
};

/// Flattens a record set into table rows, one per record, and works out the sign of each stat.
pub fn records_to_rows(records: &RecordSet) -> (Vec<StatRow>, SignConvention) {
    let signs = SignConvention::from_records(records);

    let rows = records
        .iter()
        .map(|(name, record)| StatRow::from_record(name, record))
        .collect();

    (rows, signs)
}

/// Rebuilds a record set from table rows. A repeated name keeps its first position and its last
/// row.
pub fn rows_to_records(
    rows: &[StatRow],
    signs: &SignConvention,
) -> Result<RecordSet, StatsError> {
    let mut records = RecordSet::with_capacity(rows.len());

    for row in rows {
        records.insert(row.name.clone(), row.to_record(signs)?);
    }

    Ok(records)
}

/// Converts the armor stats JSON at `input` into a TSV table at `table_path`, and saves the sign
/// of every player stat to `signs_path`. Both outputs are overwritten.
pub fn json_to_tsv<P, Q, R>(input: P, table_path: Q, signs_path: R) -> Result<usize, StatsError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let (input, table_path, signs_path) = (
        input.as_ref(),
        table_path.as_ref(),
        signs_path.as_ref(),
    );

    let bytes = fs::read(input).map_err(|source| StatsError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let records: RecordSet = serde_json::from_slice(&bytes).map_err(|source| StatsError::Json {
        path: input.to_path_buf(),
        source,
    })?;

    if records.is_empty() {
        return Err(StatsError::NoRecords(input.to_path_buf()));
    }

    let (rows, signs) = records_to_rows(&records);

    let out_file = fs::File::create(table_path).map_err(|source| StatsError::Write {
        path: table_path.to_path_buf(),
        source,
    })?;

    write_table(&rows, BufWriter::new(out_file)).map_err(|source| StatsError::Table {
        path: table_path.to_path_buf(),
        source,
    })?;

    signs.save(signs_path)?;

    info!("Converted {} -> {}", input.display(), table_path.display());
    info!(
        "Saved PlayerStat sign conventions to {}",
        signs_path.display()
    );

    Ok(rows.len())
}

/// Converts the TSV table at `table_path` back into armor stats JSON at `output`, using the signs
/// saved at `signs_path`. A missing sign file leaves every stat positive.
pub fn tsv_to_json<P, Q, R>(table_path: P, signs_path: Q, output: R) -> Result<usize, StatsError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let (table_path, signs_path, output) = (
        table_path.as_ref(),
        signs_path.as_ref(),
        output.as_ref(),
    );

    let signs = SignConvention::load(signs_path)?;

    let in_file = fs::File::open(table_path).map_err(|source| StatsError::Read {
        path: table_path.to_path_buf(),
        source,
    })?;

    let rows = read_table(in_file, table_path)?;
    let records = rows_to_records(&rows, &signs)?;

    let json = serde_json::to_vec_pretty(&records).map_err(|source| StatsError::Json {
        path: output.to_path_buf(),
        source,
    })?;

    fs::write(output, json).map_err(|source| StatsError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!("Converted {} -> {}", table_path.display(), output.display());

    Ok(records.len())
}
