use guided_vectorize::image::FOREGROUND;

/// Background raster with hand-placed foreground strokes.
pub struct EdgeCanvas {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl EdgeCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "canvas dimensions must be positive");
        Self {
            width,
            height,
            data: vec![0u8; width * height],
        }
    }

    pub fn set(&mut self, x: usize, y: usize) -> &mut Self {
        self.data[y * self.width + x] = FOREGROUND;
        self
    }

    /// Straight stroke from `from` to `to` inclusive; horizontal, vertical or 45°.
    pub fn stroke(&mut self, from: (usize, usize), to: (usize, usize)) -> &mut Self {
        let dx = (to.0 as i64 - from.0 as i64).signum();
        let dy = (to.1 as i64 - from.1 as i64).signum();
        let steps = (to.0 as i64 - from.0 as i64)
            .abs()
            .max((to.1 as i64 - from.1 as i64).abs());
        for i in 0..=steps {
            let x = (from.0 as i64 + dx * i) as usize;
            let y = (from.1 as i64 + dy * i) as usize;
            self.set(x, y);
        }
        self
    }

    /// Raw RGB bytes with the value replicated into all three channels.
    pub fn to_raw_rgb(&self) -> Vec<u8> {
        self.data.iter().flat_map(|&v| [v, v, v]).collect()
    }
}

/// Parameter file text for a grid centred on world `(0, 0)` with unit cells,
/// so pixel `(c, r)` sits at world `(c - w/2, h/2 - r)`.
pub fn parameter_text(data_id: i32, tolerance_m: f64, references: &[&str]) -> String {
    let mut text = format!(
        "{} 0 0 1 1 1 {data_id} {tolerance_m}\n",
        references.len()
    );
    for line in references {
        text.push_str(line);
        text.push('\n');
    }
    text
}
