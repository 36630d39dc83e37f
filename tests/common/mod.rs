//! Workbook fixtures shared by the integration tests
#![allow(dead_code)]

use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::{Path, PathBuf};

pub const SERVICES_FILE: &str = "precios_software_seguridad_nube.xlsx";
pub const SOLUTIONS_FILE: &str = "precios.xlsx";

/// A spreadsheet cell in a fixture row
pub enum Value {
    Text(&'static str),
    Number(f64),
    Blank,
}

use Value::{Blank, Number, Text};

/// Write `rows` under `headers` into the first sheet of a new workbook
pub fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<Value>]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            match value {
                Text(s) => {
                    sheet.write_string(r, col as u16, *s)?;
                }
                Number(n) => {
                    sheet.write_number(r, col as u16, *n)?;
                }
                Blank => {}
            }
        }
    }

    workbook.save(path)
}

/// Services workbook: two analytics rows, two recording tiers and one row
/// whose price is not a number
pub fn write_services(dir: &Path) -> PathBuf {
    let path = dir.join(SERVICES_FILE);
    write_workbook(
        &path,
        &[
            "id",
            "categoria",
            "servicio",
            "modalidad",
            "retencion_imagenes",
            "resolucion_predeterminada",
            "fps",
            "precio_usd",
            "notas",
        ],
        &[
            vec![
                Number(1.0),
                Text("LECTURA DE PLACAS"),
                Text("LPR"),
                Text("Nube"),
                Text("30 días"),
                Text("1080p"),
                Number(15.0),
                Number(30.0),
                Blank,
            ],
            vec![
                Number(2.0),
                Text("RECONOCIMIENTO FACIAL"),
                Text("Facial"),
                Text("Nube"),
                Blank,
                Blank,
                Blank,
                Number(10.0),
                Text("Requiere GPU"),
            ],
            vec![
                Number(3.0),
                Text("GRABACIÓN DE VIDEO EN LA NUBE"),
                Text("Grabación"),
                Text("7 días"),
                Blank,
                Blank,
                Blank,
                Number(15.0),
                Blank,
            ],
            vec![
                Number(4.0),
                Text("GRABACIÓN DE VIDEO EN LA NUBE"),
                Text("Grabación"),
                Text("30 días"),
                Blank,
                Blank,
                Blank,
                Number(20.0),
                Blank,
            ],
            vec![
                Blank,
                Text("FUEGO Y HUMO"),
                Text("Detección de humo"),
                Text("Nube"),
                Blank,
                Blank,
                Blank,
                Text("consultar"),
                Blank,
            ],
        ],
    )
    .expect("write services workbook");
    path
}

/// Solutions workbook: "Entrada Principal" spread over three rows, one
/// orphan row without a name, and "Perímetro"
pub fn write_solutions(dir: &Path) -> PathBuf {
    let path = dir.join(SOLUTIONS_FILE);
    write_workbook(
        &path,
        &[
            "Solución / Categoría",
            "Etiqueta",
            "Concepto",
            "Costo Real (USD)",
            "Descripción Técnica",
        ],
        &[
            vec![
                Text("Entrada Principal"),
                Text("Accesos"),
                Text("Cámara"),
                Number(5.0),
                Text("Domo 4MP"),
            ],
            vec![
                Text("Entrada Principal"),
                Text("Ignorada"),
                Text("Licencia"),
                Number(7.0),
                Blank,
            ],
            vec![Blank, Blank, Text("Huérfano"), Number(99.0), Blank],
            vec![
                Text(" Entrada Principal "),
                Blank,
                Blank,
                Number(3.0),
                Blank,
            ],
            vec![Text("Perímetro"), Blank, Text("Barrera"), Number(2.5), Blank],
        ],
    )
    .expect("write solutions workbook");
    path
}
