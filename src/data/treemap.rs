/// An axis-aligned rectangle in layout space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Tile {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }
}

/// Squarified treemap: one tile per weight, in input order, tiling `bounds`
/// with areas proportional to the weights.
///
/// Non-positive or non-finite weights get an empty tile at the origin of
/// `bounds`.
pub fn treemap_layout(weights: &[f64], bounds: Tile) -> Vec<Tile> {
    let empty = Tile::new(bounds.x, bounds.y, 0.0, 0.0);
    let mut tiles = vec![empty; weights.len()];

    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if total <= 0.0 || bounds.area() <= 0.0 {
        return tiles;
    }

    let scale = bounds.area() / total;
    let mut items: Vec<(usize, f64)> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_finite() && **w > 0.0)
        .map(|(i, w)| (i, w * scale))
        .collect();
    items.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut free = bounds;
    let mut row: Vec<(usize, f64)> = Vec::new();
    for item in items {
        let side = free.w.min(free.h);
        if row.is_empty() || {
            let mut candidate = row.clone();
            candidate.push(item);
            worst_ratio(&candidate, side) <= worst_ratio(&row, side)
        } {
            row.push(item);
        } else {
            free = place_row(&row, free, &mut tiles);
            row.clear();
            row.push(item);
        }
    }
    if !row.is_empty() {
        place_row(&row, free, &mut tiles);
    }
    tiles
}

/// Worst aspect ratio of a row laid along a side of length `side`.
fn worst_ratio(row: &[(usize, f64)], side: f64) -> f64 {
    let sum: f64 = row.iter().map(|r| r.1).sum();
    let max = row.iter().map(|r| r.1).fold(f64::NEG_INFINITY, f64::max);
    let min = row.iter().map(|r| r.1).fold(f64::INFINITY, f64::min);
    let side2 = side * side;
    let sum2 = sum * sum;
    (side2 * max / sum2).max(sum2 / (side2 * min))
}

/// Lay the row along the shorter side of `free` and return what is left.
fn place_row(row: &[(usize, f64)], free: Tile, tiles: &mut [Tile]) -> Tile {
    let sum: f64 = row.iter().map(|r| r.1).sum();
    if free.w >= free.h {
        let width = if free.h > 0.0 { sum / free.h } else { 0.0 };
        let mut y = free.y;
        for &(i, area) in row {
            let h = if width > 0.0 { area / width } else { 0.0 };
            tiles[i] = Tile::new(free.x, y, width, h);
            y += h;
        }
        Tile::new(free.x + width, free.y, (free.w - width).max(0.0), free.h)
    } else {
        let height = if free.w > 0.0 { sum / free.w } else { 0.0 };
        let mut x = free.x;
        for &(i, area) in row {
            let w = if height > 0.0 { area / height } else { 0.0 };
            tiles[i] = Tile::new(x, free.y, w, height);
            x += w;
        }
        Tile::new(free.x, free.y + height, free.w, (free.h - height).max(0.0))
    }
}
