// CSV dump of the evaluations.

use std::io;

use crate::eval::*;

/// The columns of an export, in order. They are the stored attribute names.
pub fn export_headers() -> Vec<&'static str> {
    let mut headers = vec!["id", "project", "name", "role", "date"];
    headers.extend(Criterion::ALL.iter().map(|c| c.column_name()));
    headers.push("average_score");
    headers.push("comments");
    headers
}

fn opt_number(x: Option<f64>) -> String {
    x.map(|x| x.to_string()).unwrap_or_default()
}

fn record_fields(r: &EvaluationRecord) -> Vec<String> {
    let mut fields = vec![
        r.id.to_string(),
        r.project.clone(),
        r.name.clone(),
        r.role.clone(),
        r.date.clone(),
    ];
    fields.extend(r.scores.iter().map(|(_, x)| opt_number(x)));
    fields.push(opt_number(r.average_score));
    fields.push(r.comments.clone());
    fields
}

/// Writes the records, in the given order, with a header line.
pub fn write_records<W: io::Write>(records: &[EvaluationRecord], out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(export_headers())?;
    for r in records {
        wtr.write_record(record_fields(r))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_to_file(records: &[EvaluationRecord], path: &str) -> EvalResult<()> {
    info!("Writing {} evaluations to {:?}", records.len(), path);
    let file = std::fs::File::create(path).context(WritingOutputSnafu { path })?;
    write_records(records, file).context(WritingExportSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: RecordId, name: &str, scores: Scores) -> EvaluationRecord {
        EvaluationRecord {
            id,
            project: DEFAULT_PROJECT.to_string(),
            name: name.to_string(),
            role: "instructor".to_string(),
            date: "2024-04-01".to_string(),
            scores,
            average_score: scores.average(),
            comments: "windy, gusty".to_string(),
        }
    }

    #[test]
    fn header_line() {
        let mut out: Vec<u8> = Vec::new();
        write_records(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,project,name,role,date,leadership,attendance,flexibility,theory,command,control,\
             body_drag_left_right,water_start,board_left_right,upwind,average_score,comments\n"
        );
    }

    #[test]
    fn rows_in_given_order_with_empty_cells() {
        let records = vec![
            record(2, "Rui", Scores::default().with(Criterion::Leadership, 72.5)),
            record(1, "Ana", Scores::default()),
        ];
        let mut out: Vec<u8> = Vec::new();
        write_records(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2,KITE FOR LIFE,Rui,instructor,2024-04-01,72.5,,,,,,,,,,72.5,\"windy, gusty\""
        );
        assert!(lines[2].starts_with("1,KITE FOR LIFE,Ana,"));
    }

    #[test]
    fn export_reimports() {
        let records = vec![record(1, "Ana", Scores::uniform(64.0))];
        let mut out: Vec<u8> = Vec::new();
        write_records(&records, &mut out).unwrap();
        let rows = io_csv::read_rows(csv::Reader::from_reader(out.as_slice())).unwrap();
        assert_eq!(rows.len(), 1);
        let draft = reconcile_row(&rows[0].cells);
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.scores, Scores::uniform(64.0));
        assert_eq!(draft.comments, "windy, gusty");
    }
}
