//! Shared fixture tables for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const PROTEINS: &str = "\
P12345\treviewed\tKIN1_HUMAN\tKinase 1\tHomo sapiens\t60
Q9Y6K9\treviewed\tNEMO_HUMAN\tNF-kappa-B essential modulator\tHomo sapiens\t40
A00001\treviewed\tTEST_HUMAN\tUnannotated protein\tHomo sapiens\t30
";

pub const DOMAINS: &str = "\
acc\ttednum\tdom_start\tdom_end\tqcat
P12345\tTED02\t31\t45\tB
P12345\tTED01\t11\t20\tA
P12345\tTED03\t50\t70\t
Q9Y6K9\tTED01\t5\t30\tZ
X00000\tTED01\t1\t10\tA
";

/// Residue strings for P12345 (60) and Q9Y6K9 (40)
pub fn annotations() -> String {
    let p12345_th50 = format!(
        "{}{}{}{}",
        "1".repeat(10),
        "0".repeat(10),
        "1".repeat(10),
        "0".repeat(30)
    );
    let q9y6k9_th50 = "0".repeat(40);
    format!(
        "acc\tprediction-disorder-th_50_sequence\tprediction-disorder-mobidb_lite_sequence\n\
         P12345\t{}\t\n\
         Q9Y6K9\t{}\t{}\n",
        p12345_th50,
        q9y6k9_th50,
        "1".repeat(40)
    )
}

pub struct Fixture {
    pub proteins: PathBuf,
    pub domains: PathBuf,
    pub annotations: PathBuf,
}

/// Write the three input tables into `dir`
pub fn write_fixture(dir: &Path) -> Fixture {
    let fixture = Fixture {
        proteins: dir.join("proteins.tsv"),
        domains: dir.join("domains.tsv"),
        annotations: dir.join("annotations.tsv"),
    };
    fs::write(&fixture.proteins, PROTEINS).unwrap();
    fs::write(&fixture.domains, DOMAINS).unwrap();
    fs::write(&fixture.annotations, annotations()).unwrap();
    fixture
}
