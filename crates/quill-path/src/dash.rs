//! Dashing of quadratic paths.

use crate::curve::ArcLength;
use crate::{Element, QuadPath};
use arrayvec::ArrayVec;
use glam::Vec2;

/// Samples in the arc length table of a curve element.
const LUT_SIZE: usize = 21;

/// Chords per table interval when the closed-form arc length is unusable.
const FALLBACK_SUBDIVISIONS: usize = 8;

/// Dash pattern for stroked outlines.
///
/// Lengths are in units of the line width, alternating dash and gap. A trailing
/// unpaired entry is ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    /// Alternating on/off lengths.
    pub pattern: Vec<f32>,
    /// Offset into the pattern to start.
    pub offset: f32,
}

impl DashPattern {
    pub fn new(pattern: Vec<f32>, offset: f32) -> Self {
        Self { pattern, offset }
    }

    /// Create a simple dashed line.
    pub fn dashed(dash: f32, gap: f32) -> Self {
        Self::new(vec![dash, gap], 0.0)
    }

    /// Create a dotted line.
    pub fn dotted(gap: f32) -> Self {
        Self::new(vec![0.0, gap], 0.0)
    }

    /// Create a dash-dot pattern.
    pub fn dash_dot(dash: f32, gap: f32, dot: f32) -> Self {
        Self::new(vec![dash, gap, dot, gap], 0.0)
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }
}

/// Cuts consecutive pieces of given lengths off a single element.
struct ElementCutter<'a> {
    element: &'a Element,
    last_t: f32,
    current_t: f32,
    last_point: Vec2,
    current_point: Vec2,
    /// Kept in f64 so short pieces still advance far along long elements.
    consumed: f64,
    line_length: f32,
    /// Arc length at `t = i / (LUT_SIZE - 1)`, curves only.
    lut: ArrayVec<f32, LUT_SIZE>,
}

impl<'a> ElementCutter<'a> {
    fn new(element: &'a Element) -> Self {
        let mut cutter = Self {
            element,
            last_t: 0.0,
            current_t: 0.0,
            last_point: element.sp,
            current_point: element.sp,
            consumed: 0.0,
            line_length: 0.0,
            lut: ArrayVec::new(),
        };
        if element.is_line {
            cutter.line_length = (element.ep - element.sp).length();
        } else {
            cutter.fill_lut();
        }
        cutter
    }

    fn fill_lut(&mut self) {
        let curve = self.element.as_quadratic();
        let step = 1.0 / (LUT_SIZE - 1) as f32;

        self.lut.push(0.0);
        if let Some(arc) = ArcLength::new(&curve) {
            for i in 1..LUT_SIZE {
                self.lut.push(arc.at(i as f32 * step));
            }
            let usable = self.lut.iter().all(|l| l.is_finite())
                && self.lut.windows(2).all(|w| w[1] >= w[0]);
            if usable {
                return;
            }
            self.lut.truncate(1);
        }

        let mut length = 0.0;
        let mut prev = curve.from;
        for i in 1..LUT_SIZE {
            for j in 1..=FALLBACK_SUBDIVISIONS {
                let t = ((i - 1) as f32 + j as f32 / FALLBACK_SUBDIVISIONS as f32) * step;
                let point = curve.eval(t);
                length += prev.distance(point);
                prev = point;
            }
            self.lut.push(length);
        }
    }

    fn total_length(&self) -> f32 {
        if self.element.is_line {
            self.line_length
        } else {
            self.lut.last().copied().unwrap_or(0.0)
        }
    }

    /// Parameter at arc length `length`, or 2 when the element is shorter than that.
    fn t_for_length(&self, length: f32) -> f32 {
        let next = self.lut.partition_point(|&l| l <= length);
        if next >= self.lut.len() {
            return 2.0;
        }
        if next == 0 {
            return 0.0;
        }
        let prev = next - 1;
        let fraction = (length - self.lut[prev]) / (self.lut[next] - self.lut[prev]);
        (prev as f32 + fraction) / (LUT_SIZE - 1) as f32
    }

    /// Cut `length` further along the element. Returns `false`, leaving the cut at the
    /// end point, when the remaining element is not long enough or a positive
    /// `length` no longer moves the cut.
    fn consume(&mut self, length: f32) -> bool {
        self.last_t = self.current_t;
        self.last_point = self.current_point;
        let next_cut = self.consumed + f64::from(length);
        let stalled = length > 0.0 && next_cut <= self.consumed;
        let cut_t = if self.element.is_line {
            (next_cut / f64::from(self.line_length)) as f32
        } else {
            self.t_for_length(next_cut as f32)
        };

        if cut_t < 1.0 && !stalled {
            self.current_t = cut_t;
            self.current_point = self.element.point_at_fraction(cut_t);
            self.consumed = next_cut;
            true
        } else {
            self.current_t = 1.0;
            self.current_point = self.element.ep;
            false
        }
    }

    fn current_cut_point(&self) -> Vec2 {
        self.current_point
    }

    /// Control point of the curve piece between the last two cuts.
    fn current_control_point(&self) -> Vec2 {
        debug_assert!(!self.element.is_line);
        // Right part after last_t is { last_point, rcp, ep }.
        let rcp = (1.0 - self.last_t) * self.element.cp + self.last_t * self.element.ep;
        // Its left part up to current_t.
        let segment_t = (self.current_t - self.last_t) / (1.0 - self.last_t);
        (1.0 - segment_t) * self.last_point + segment_t * rcp
    }

    /// Length left uncut at the end of the element.
    fn last_length(&self) -> f32 {
        (f64::from(self.total_length()) - self.consumed).max(0.0) as f32
    }
}

impl QuadPath {
    /// Dashed copy of this path. Dashes become elements, gaps become moves.
    ///
    /// `pattern` and `offset` are in units of `line_width`. Every sub-path restarts
    /// the pattern at `offset`. A pattern with zero total length yields an empty path.
    pub fn dashed(&self, line_width: f32, pattern: &[f32], offset: f32) -> QuadPath {
        puffin::profile_function!();

        let count = 2 * (pattern.len() / 2);
        let pattern: Vec<f32> = pattern[..count]
            .iter()
            .map(|&len| (line_width * len).max(0.0))
            .collect();
        let pattern_length: f32 = pattern.iter().sum();
        if pattern_length == 0.0 || !pattern_length.is_finite() {
            return self.empty_like();
        }

        let phase = line_width * offset;
        let phase = if phase.is_finite() { phase } else { 0.0 };
        let mut start_index = 0;
        let mut start_offset = phase % pattern_length;
        if start_offset < 0.0 {
            start_offset += pattern_length;
        }
        for &dash_length in &pattern {
            if dash_length > start_offset {
                break;
            }
            start_index += 1;
            start_offset -= dash_length;
        }
        // Rounding can leave the phase at the very end of the period.
        if start_index >= pattern.len() {
            start_index = 0;
            start_offset = 0.0;
        }

        let mut dash_index = start_index;
        let mut dash_offset = start_offset;
        let mut res = self.empty_like();
        for element in self.elements() {
            if element.is_subpath_start {
                res.move_to(element.sp);
                dash_index = start_index;
                dash_offset = start_offset;
            }

            let mut cutter = ElementCutter::new(element);
            loop {
                let got_all = cutter.consume(pattern[dash_index] - dash_offset);
                let next_point = cutter.current_cut_point();
                if dash_index & 1 == 1 {
                    res.move_to(next_point);
                } else if element.is_line {
                    res.line_to(next_point);
                } else {
                    res.quad_to(cutter.current_control_point(), next_point);
                }

                if got_all {
                    dash_offset = 0.0;
                    dash_index = (dash_index + 1) % pattern.len();
                } else {
                    dash_offset += cutter.last_length();
                    break;
                }
            }
        }

        res
    }

    /// [`QuadPath::dashed`] with a [`DashPattern`].
    pub fn dashed_with(&self, line_width: f32, dash: &DashPattern) -> QuadPath {
        self.dashed(line_width, &dash.pattern, dash.offset)
    }
}
