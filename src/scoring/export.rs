// src/scoring/export.rs

use super::grade::PassThreshold;
use super::scorer::ScoredStudent;
use super::stats::{ClassStatistics, GradedEntry};
use crate::config;

const COLUMN_COUNT: usize = 6;

/// Serializes a scored batch plus its statistics block to CSV.
///
/// Column order and labels are the wire contract: one quoted row per
/// student, a blank separator line, then the fixed-label statistics block.
pub fn render_csv(students: &[ScoredStudent], threshold: PassThreshold) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();

    rows.push(vec![
        "Alumno".to_string(),
        "Puntaje Total".to_string(),
        "Puntaje Máximo".to_string(),
        "Porcentaje Correctas".to_string(),
        format!("Nota (Nivel Exigencia: {}%)", threshold.value()),
        "Estado".to_string(),
    ]);

    for student in students {
        let estado = if student.grade >= config::PASSING_GRADE {
            "Aprobado"
        } else {
            "Reprobado"
        };
        rows.push(vec![
            format!("{} {}", student.given_name, student.family_name)
                .trim()
                .to_string(),
            student.total_points.to_string(),
            student.max_points.to_string(),
            format!("{:.1}%", student.percentage),
            student.grade.to_string(),
            estado.to_string(),
        ]);
    }

    let entries: Vec<GradedEntry> = students
        .iter()
        .map(|s| GradedEntry {
            percentage: s.percentage,
            grade: s.grade,
        })
        .collect();
    let stats = ClassStatistics::compute(&entries);

    // Blank separator line between results and statistics.
    rows.push(Vec::new());
    rows.push(pad(vec!["ESTADÍSTICAS GENERALES".to_string()]));
    rows.push(pad(vec![
        "Total Alumnos".to_string(),
        stats.total_students.to_string(),
    ]));
    rows.push(pad(vec![
        "Promedio Nota".to_string(),
        stats.average_grade.to_string(),
    ]));
    rows.push(pad(vec!["Aprobados".to_string(), stats.passed.to_string()]));
    rows.push(pad(vec![
        "Porcentaje Aprobación".to_string(),
        format!("{}%", stats.pass_rate),
    ]));

    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| format!("\"{}\"", cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pad(mut row: Vec<String>) -> Vec<String> {
    row.resize(COLUMN_COUNT, String::new());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(
        name: (&str, &str),
        total: i64,
        max: i64,
        percentage: f64,
        grade: f64,
    ) -> ScoredStudent {
        ScoredStudent {
            student_key: name.0.to_string(),
            given_name: name.0.to_string(),
            family_name: name.1.to_string(),
            total_points: total,
            max_points: max,
            percentage,
            grade,
            outcomes: Vec::new(),
        }
    }

    #[test]
    fn test_header_carries_the_threshold() {
        let threshold = PassThreshold::new(60.0).unwrap();
        let csv = render_csv(&[], threshold);
        let header = csv.lines().next().unwrap();

        assert_eq!(
            header,
            "\"Alumno\",\"Puntaje Total\",\"Puntaje Máximo\",\"Porcentaje Correctas\",\"Nota (Nivel Exigencia: 60%)\",\"Estado\""
        );
    }

    #[test]
    fn test_student_rows_and_statistics_block() {
        let threshold = PassThreshold::new(60.0).unwrap();
        let students = vec![
            student(("Ana", "Perez"), 10, 10, 100.0, 7.0),
            student(("Luis", "Diaz"), 5, 10, 50.0, 3.5),
        ];
        let csv = render_csv(&students, threshold);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[1],
            "\"Ana Perez\",\"10\",\"10\",\"100.0%\",\"7\",\"Aprobado\""
        );
        assert_eq!(
            lines[2],
            "\"Luis Diaz\",\"5\",\"10\",\"50.0%\",\"3.5\",\"Reprobado\""
        );
        // Blank separator, then the fixed-label block.
        assert_eq!(lines[3], "");
        assert!(lines[4].starts_with("\"ESTADÍSTICAS GENERALES\""));
        assert!(lines[5].starts_with("\"Total Alumnos\",\"2\""));
        assert!(lines[6].starts_with("\"Promedio Nota\",\"5.25\""));
        assert!(lines[7].starts_with("\"Aprobados\",\"1\""));
        assert!(lines[8].starts_with("\"Porcentaje Aprobación\",\"50%\""));
    }

    #[test]
    fn test_percentage_is_formatted_to_one_decimal() {
        let threshold = PassThreshold::new(60.0).unwrap();
        let students = vec![student(("Ana", "Perez"), 2, 3, 200.0 / 3.0, 4.33)];
        let csv = render_csv(&students, threshold);

        assert!(csv.contains("\"66.7%\""), "{}", csv);
    }
}
