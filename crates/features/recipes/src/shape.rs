use std::fmt;
use zitems_domain::recipe::{Ingredient, RecipeDefinition, RecipeKind};

/// The input side of a recipe in a canonical form, so equal inputs compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecipeShape {
    /// A shaped grid with empty outer rows and columns trimmed, row-major.
    Grid { width: usize, height: usize, cells: Vec<Option<Ingredient>> },
    /// Shapeless inputs, sorted.
    Multiset(Vec<Ingredient>),
    /// Cooking and stonecutting input.
    Single(Ingredient),
}

impl RecipeShape {
    /// Normalizes a recipe; `None` when it has no usable input.
    #[must_use]
    pub fn normalize(recipe: &RecipeDefinition) -> Option<Self> {
        match recipe.kind {
            RecipeKind::Shaped => normalize_grid(recipe),
            RecipeKind::Shapeless => {
                let mut inputs = recipe.ingredients.clone();
                if inputs.is_empty() {
                    return None;
                }
                inputs.sort();
                Some(Self::Multiset(inputs))
            },
            _ => recipe.ingredients.first().cloned().map(Self::Single),
        }
    }

    /// Every ingredient slot in order; empty grid cells are skipped.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        let (cells, list): (&[Option<Ingredient>], &[Ingredient]) = match self {
            Self::Grid { cells, .. } => (cells, &[]),
            Self::Multiset(list) => (&[], list),
            Self::Single(single) => (&[], std::slice::from_ref(single)),
        };
        cells.iter().flatten().chain(list)
    }
}

fn normalize_grid(recipe: &RecipeDefinition) -> Option<RecipeShape> {
    let width = recipe.pattern.iter().map(|row| row.chars().count()).max()?;
    let mut grid: Vec<Vec<Option<Ingredient>>> = Vec::with_capacity(recipe.pattern.len());
    for row in &recipe.pattern {
        let mut cells = Vec::with_capacity(width);
        for symbol in row.chars() {
            if symbol == ' ' {
                cells.push(None);
            } else {
                cells.push(Some(recipe.legend.get(&symbol)?.clone()));
            }
        }
        cells.resize(width, None);
        grid.push(cells);
    }

    let filled_row = |row: &Vec<Option<Ingredient>>| row.iter().any(Option::is_some);
    let top = grid.iter().position(filled_row)?;
    let bottom = grid.iter().rposition(filled_row)?;
    let rows = &grid[top..=bottom];

    let filled_column = |column: usize| rows.iter().any(|row| row[column].is_some());
    let left = (0..width).find(|&c| filled_column(c))?;
    let right = (0..width).rev().find(|&c| filled_column(c))?;

    let cells = rows.iter().flat_map(|row| row[left..=right].iter().cloned()).collect();
    Some(RecipeShape::Grid { width: right - left + 1, height: rows.len(), cells })
}

impl fmt::Display for RecipeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid { width, cells, .. } => {
                for (index, row) in cells.chunks(*width).enumerate() {
                    if index > 0 {
                        f.write_str(" / ")?;
                    }
                    let row: Vec<String> = row
                        .iter()
                        .map(|cell| cell.as_ref().map_or_else(|| "_".to_owned(), ToString::to_string))
                        .collect();
                    write!(f, "[{}]", row.join(", "))?;
                }
                Ok(())
            },
            Self::Multiset(inputs) => {
                let inputs: Vec<String> = inputs.iter().map(ToString::to_string).collect();
                write!(f, "{{{}}}", inputs.join(", "))
            },
            Self::Single(input) => write!(f, "{input}"),
        }
    }
}
