use crate::catalog::CommandRecord;

/// A command paired with one lowercase blob of everything worth searching.
///
/// Built per query and dropped with it; the catalog record is only borrowed.
#[derive(Debug, Clone)]
pub struct EnrichedRecord<'a> {
    pub record: &'a CommandRecord,
    pub searchable_text: String,
}

impl<'a> EnrichedRecord<'a> {
    pub fn new(record: &'a CommandRecord) -> Self {
        Self {
            record,
            searchable_text: searchable_text(record),
        }
    }
}

/// Description, example notes, flag descriptions, tags and name, lowercased.
pub fn searchable_text(record: &CommandRecord) -> String {
    let examples = record
        .examples
        .iter()
        .map(|ex| {
            format!(
                "{} {}",
                ex.short_description,
                ex.explanation.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    let flags = record
        .flags
        .iter()
        .map(|f| f.description.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let tags = record.tags.join(" ");

    [
        record.description.as_str(),
        examples.as_str(),
        flags.as_str(),
        tags.as_str(),
        record.name.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Enrich every record of a slice.
pub fn enrich_all(records: &[CommandRecord]) -> Vec<EnrichedRecord<'_>> {
    records.iter().map(EnrichedRecord::new).collect()
}
