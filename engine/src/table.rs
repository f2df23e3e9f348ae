use std::{collections::HashMap, fmt};

// column-labelled grid of cells, printed as a boxed text table
#[derive(Debug, Clone, Default)]
pub struct Table<T> {
    cols: Vec<String>,
    col_idx: HashMap<String, usize>,
    rows: Vec<Vec<T>>,
}

impl<T: Default + Clone> Table<T> {
    pub fn new() -> Table<T> {
        Table {
            cols: Vec::new(),
            col_idx: HashMap::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_columns(cols: Vec<String>) -> Table<T> {
        let mut t = Table::new();
        t.set_columns(cols);
        t
    }

    // later duplicates shadow earlier ones in lookups
    pub fn set_columns(&mut self, cols: Vec<String>) {
        self.col_idx = cols
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        self.cols = cols;
        self.rows.clear();
    }

    pub fn columns(&self) -> &[String] {
        &self.cols
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn add_row(&mut self) -> usize {
        self.rows.push(vec![T::default(); self.cols.len()]);
        self.rows.len() - 1
    }

    pub fn push_row(&mut self, mut row: Vec<T>) -> usize {
        row.resize(self.cols.len(), T::default());
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn set_val_at(&mut self, row: usize, col: &str, val: T) -> bool {
        match (self.col_idx.get(col), self.rows.get_mut(row)) {
            (Some(&j), Some(r)) => {
                r[j] = val;
                true
            }
            _ => false,
        }
    }

    pub fn get_val_at(&self, row: usize, col: &str) -> Option<&T> {
        let j = *self.col_idx.get(col)?;
        self.rows.get(row).map(|r| &r[j])
    }
}

impl<T: fmt::Display> fmt::Display for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self
            .cols
            .iter()
            .enumerate()
            .map(|(j, c)| {
                self.rows
                    .iter()
                    .map(|r| r[j].to_string().chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
                    + 2
            })
            .collect::<Vec<usize>>();
        write_rule(f, &widths, '-')?;
        write!(f, "|")?;
        for (c, w) in self.cols.iter().zip(&widths) {
            write!(f, "{:^w$}|", c, w = *w)?;
        }
        writeln!(f)?;
        write_rule(f, &widths, '=')?;
        for row in &self.rows {
            write!(f, "|")?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "{:^w$}|", cell.to_string(), w = *w)?;
            }
            writeln!(f)?;
        }
        write_rule(f, &widths, '-')
    }
}

fn write_rule(f: &mut fmt::Formatter<'_>, widths: &[usize], ch: char) -> fmt::Result {
    write!(f, "+")?;
    for w in widths {
        write!(f, "{}+", ch.to_string().repeat(*w))?;
    }
    writeln!(f)
}

/// All assignments of `bits` booleans, most significant first.
pub fn bitwise_counter(bits: usize) -> impl Iterator<Item = Vec<bool>> {
    let total_combs = 1u64 << bits;
    (0..total_combs).map(move |n| (0..bits).rev().map(|i| (n >> i) & 1 == 1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_enumerates_in_binary_order() {
        let all: Vec<Vec<bool>> = bitwise_counter(2).collect();
        assert_eq!(
            all,
            vec![
                vec![false, false],
                vec![false, true],
                vec![true, false],
                vec![true, true]
            ]
        );
        assert_eq!(bitwise_counter(0).count(), 1);
    }

    #[test]
    fn cells_by_column_label() {
        let mut t = Table::<char>::with_columns(vec!["A".into(), "F".into()]);
        let r = t.add_row();
        assert!(t.set_val_at(r, "F", '1'));
        assert!(!t.set_val_at(r, "G", '1'));
        assert_eq!(t.get_val_at(r, "F"), Some(&'1'));
        assert_eq!(t.get_val_at(r, "A"), Some(&char::default()));
        assert_eq!(t.get_val_at(3, "A"), None);
    }

    #[test]
    fn display_pads_columns() {
        let mut t = Table::<char>::with_columns(vec!["in".into(), "out_1".into()]);
        t.push_row(vec!['0', '1']);
        let text = t.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "| in | out_1 |");
        assert_eq!(lines[3], "| 0  |   1   |");
    }
}
