//! Every `tests/fixtures/*.svg` is measured and its text report compared
//! against the `.txt` file next to it.

use datatest_stable::Utf8Path;
use neonmeter::{Options, measure};

fn check_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let expected_path = path.with_extension("txt");
    let expected = std::fs::read_to_string(&expected_path)
        .map_err(|e| format!("reading {expected_path}: {e}"))?;

    let report = measure(&source, &Options::default())?;
    let actual = report.to_string();
    if actual != expected {
        return Err(format!(
            "{path}: report differs\n{}",
            dissimilar::diff(&expected, &actual)
                .into_iter()
                .map(|chunk| match chunk {
                    dissimilar::Chunk::Equal(s) => s.to_string(),
                    dissimilar::Chunk::Delete(s) => format!("[-{s}-]"),
                    dissimilar::Chunk::Insert(s) => format!("{{+{s}+}}"),
                })
                .collect::<String>()
        )
        .into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = check_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.svg$" },
}
