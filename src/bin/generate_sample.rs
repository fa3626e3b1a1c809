use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Tracks written to the sample indicators. STHR is left out on purpose so the
/// dashboard has a specialty without a column.
const SERIES: [&str; 11] = [
    "Toutes series", "L", "ES", "S", "Gnle", "STI2D", "STD2A", "STMG", "STL", "ST2S", "S2TMD",
];

const YEARS: [i64; 4] = [2019, 2020, 2021, 2022];

struct School {
    uai: &'static str,
    name: &'static str,
    region: &'static str,
    kind: &'static str,
    department: &'static str,
    commune: &'static str,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

const SCHOOLS: [School; 8] = [
    School { uai: "0750654D", name: "Lycée Henri IV", region: "ILE-DE-FRANCE", kind: "Lycée", department: "PARIS", commune: "PARIS 05", latitude: Some(48.8459), longitude: Some(2.3477) },
    School { uai: "0750655E", name: "Lycée Louis-le-Grand", region: "ILE-DE-FRANCE", kind: "Lycée", department: "PARIS", commune: "PARIS 05", latitude: Some(48.8483), longitude: Some(2.3444) },
    School { uai: "0750668U", name: "Lycée Fénelon", region: "ILE-DE-FRANCE", kind: "Lycée", department: "PARIS", commune: "PARIS 06", latitude: Some(48.8531), longitude: Some(2.3406) },
    School { uai: "0940117C", name: "Lycée Marcelin Berthelot", region: "ILE-DE-FRANCE", kind: "Lycée", department: "VAL-DE-MARNE", commune: "SAINT-MAUR-DES-FOSSES", latitude: Some(48.7983), longitude: Some(2.4995) },
    School { uai: "0940121G", name: "Lycée Guillaume Budé", region: "ILE-DE-FRANCE", kind: "Lycée", department: "VAL-DE-MARNE", commune: "LIMEIL-BREVANNES", latitude: None, longitude: None },
    School { uai: "0921555A", name: "Lycée Lakanal", region: "ILE-DE-FRANCE", kind: "Lycée", department: "HAUTS-DE-SEINE", commune: "SCEAUX", latitude: Some(48.7779), longitude: Some(2.2948) },
    School { uai: "0750700D", name: "Collège Montaigne", region: "ILE-DE-FRANCE", kind: "Collège", department: "PARIS", commune: "PARIS 06", latitude: Some(48.8452), longitude: Some(2.3366) },
    School { uai: "0130040Y", name: "Lycée Thiers", region: "PROVENCE-ALPES-COTE D'AZUR", kind: "Lycée", department: "BOUCHES-DU-RHONE", commune: "MARSEILLE", latitude: Some(43.2980), longitude: Some(5.3810) },
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`, rounded to one decimal like the open data.
    fn rate(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 10.0).round() / 10.0
    }
}

fn write_indicators(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["UAI".to_string(), "Annee".to_string()];
    header.extend(SERIES.iter().map(|s| format!("Taux de reussite - {s}")));
    writer.write_record(&header)?;

    let mut rows = 0;
    for school in &SCHOOLS {
        for year in YEARS {
            let mut record = vec![school.uai.to_string(), year.to_string()];
            for _ in SERIES {
                // roughly one track in four is not offered
                let cell = if rng.next_f64() < 0.25 {
                    String::new()
                } else {
                    rng.rate(70.0, 100.0).to_string()
                };
                record.push(cell);
            }
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_directory_csv(path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record([
        "Identifiant_de_l_etablissement",
        "Nom_etablissement",
        "Region",
        "Type_etablissement",
        "Libelle_departement",
        "Nom_commune",
        "latitude",
        "longitude",
    ])?;
    let coord = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for s in &SCHOOLS {
        writer.write_record([
            s.uai.to_string(),
            s.name.to_string(),
            s.region.to_string(),
            s.kind.to_string(),
            s.department.to_string(),
            s.commune.to_string(),
            coord(s.latitude),
            coord(s.longitude),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_directory_parquet(path: &Path) -> Result<()> {
    let text = |f: fn(&School) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(SCHOOLS.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&School) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(SCHOOLS.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Identifiant_de_l_etablissement", DataType::Utf8, false),
        Field::new("Nom_etablissement", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Type_etablissement", DataType::Utf8, false),
        Field::new("Libelle_departement", DataType::Utf8, false),
        Field::new("Nom_commune", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|s| s.uai),
            text(|s| s.name),
            text(|s| s.region),
            text(|s| s.kind),
            text(|s| s.department),
            text(|s| s.commune),
            number(|s| s.latitude),
            number(|s| s.longitude),
        ],
    )
    .context("building directory record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing directory batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let indicators = out_dir.join("fr-en-indicateurs-de-resultat-des-lycees-gt_v2.csv");
    let rows = write_indicators(&indicators, &mut rng)?;

    let directory = out_dir.join("fr-en-annuaire-education.csv");
    write_directory_csv(&directory)?;

    let directory_pq = out_dir.join("fr-en-annuaire-education.parquet");
    write_directory_parquet(&directory_pq)?;

    println!(
        "Wrote {rows} indicator rows to {}, {} schools to {} and {}",
        indicators.display(),
        SCHOOLS.len(),
        directory.display(),
        directory_pq.display()
    );
    Ok(())
}
