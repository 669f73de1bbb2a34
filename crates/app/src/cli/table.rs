use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Render rows under a header with rounded borders, right-aligning the
/// columns listed in `numeric`.
pub(crate) fn render<const N: usize>(
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
    numeric: &[usize],
) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    for column in numeric {
        table.modify(Columns::one(*column), Alignment::right());
    }

    table.to_string()
}
