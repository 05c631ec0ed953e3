/*!

This is the long-form manual for `staff_evaluation` and `kiteval`.

## Input formats

The following formats are supported for imports:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel workbooks, the first row of the worksheet being the header

Any other column is ignored, and no column is required: a file with
unrelated headers imports records where every field is empty.

### Headers

Headers are matched exactly against the lists below. When several of them are
present in a file, the first one in the list holding a value wins. Empty cells
and the usual spreadsheet null markers (`NA`, `N/A`, `#N/A`, `null`, `NaN`, ...)
count as no value.

| Field | Accepted headers |
|-------|------------------|
| project | `projeto`, `PROJETO`, `Projeto`, `project`, ... |
| name | `nome`, `Nome`, `NOME`, `name`, ... |
| role | `cargo`, `Cargo`, `CARGO`, `role`, ... |
| date | `data`, `Data`, `DATA`, `date`, ... |
| leadership | `liderança`, `lideranca`, `LIDERANÇA`, `LIDERANCA`, ... |
| attendance | `assiduidade`, `Assiduidade`, `ASSIDUIDADE`, ... |
| flexibility | `flexibilidade`, `Flexibilidade`, `FLEXIBILIDADE`, ... |
| theory | `teoria`, `Teoria`, `TEORIA`, ... |
| command | `comando`, `Comando`, `COMANDO`, ... |
| control | `controle`, `Controle`, `CONTROLE`, ... |
| body_drag_left_right | `badydrag esq/dir`, `badydrag_esq_dir`, `badydrag`, ... |
| water_start | `water start`, `water_start`, `Water Start`, `water-start`, ... |
| board_left_right | `prancha esq/dir`, `prancha_esq_dir`, `PRANCHA ESQ/DIR`, ... |
| upwind | `contra vento`, `contra_vento`, `contra-vento`, ... |
| comments | `comentarios`, `Comentários`, `COMENTARIOS`, ... |

The complete lists live in [`crate::reconcile`]. The English column names of an
export are always accepted, so exported files can be imported again. The `id`
and `average_score` columns of an export are ignored: the store assigns the
first and computes the second.

### Values

Scores are read as decimal numbers (`72.5`). A score that cannot be read
(`7,5`, `good`, ...) is left empty, it does not stop the import. The project
falls back to `KITE FOR LIFE` when empty. Dates are kept as written.

## Statistics

The average score of an evaluation is the mean of the criteria that are
filled. An evaluation without any criterion has no average, and it is left out
of every mean over averages. Means are rounded to two decimals for display only.
*/
