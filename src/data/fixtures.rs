//! Shared test datasets.

use super::{Brand, Database, Engine, Model, Stage};

pub fn stage(label: &str, stock: (i64, i64), tuned: (i64, i64)) -> Stage {
    Stage {
        stage: label.to_string(),
        stock_hp: stock.0,
        stock_nm: stock.1,
        tuned_hp: tuned.0,
        tuned_nm: tuned.1,
        notes: Vec::new(),
    }
}

pub fn model(id: &str, name: &str, year: i32, month: Option<u32>) -> Model {
    Model {
        id: id.to_string(),
        name: name.to_string(),
        year,
        month,
        engines: Vec::new(),
    }
}

pub fn engine(id: &str, name: &str) -> Engine {
    Engine {
        id: id.to_string(),
        name: name.to_string(),
        stages: Vec::new(),
    }
}

/// BMW M5 F90 with two stages, plus a Mercedes-AMG C63 on the M177
pub fn sample_database() -> Database {
    let mut s63 = engine("s63b44t4", "S63B44T4");
    s63.stages.push(stage("1", (600, 750), (720, 900)));
    let mut stage2 = stage("2", (600, 750), (780, 960));
    stage2.notes.push("Requires upgraded downpipes".to_string());
    s63.stages.push(stage2);

    let mut m5 = model("m5f90", "M5 F90", 2021, None);
    m5.engines.push(s63);

    let mut m177 = engine("m177", "M177 4.0 V8 Biturbo");
    m177.stages.push(stage("1", (510, 700), (620, 850)));

    let mut c63 = model("c63w205", "C63 AMG W205", 2019, Some(3));
    c63.engines.push(m177);

    Database {
        brands: vec![
            Brand {
                id: "bmw".to_string(),
                name: "BMW".to_string(),
                models: vec![m5],
            },
            Brand {
                id: "mercedes".to_string(),
                name: "Mercedes-Benz".to_string(),
                models: vec![c63],
            },
        ],
    }
}
