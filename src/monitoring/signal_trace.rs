use crate::control_system::signal_io::Actuator;
use crate::global_variables::LANE_COUNT;
use crate::shared_data::SignalEvent;
use crate::simulation_engine::intersections::{Aspect, LaneId};
use plotters::prelude::*;
use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// A run of one aspect on one lane. `until_ms` is `None` while it still shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub aspect: Aspect,
    pub from_ms: u64,
    pub until_ms: Option<u64>,
}

impl Segment {
    pub fn duration_ms(&self) -> Option<u64> {
        self.until_ms.map(|until| until - self.from_ms)
    }
}

/// In-memory recorder of every lamp change.
#[derive(Debug, Clone, Default)]
pub struct SignalTrace {
    events: Vec<SignalEvent>,
}

impl SignalTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SignalEvent] {
        &self.events
    }

    pub fn events_for(&self, lane: LaneId) -> impl Iterator<Item = &SignalEvent> {
        self.events.iter().filter(move |e| e.lane == lane)
    }

    /// Collapses a lane's events into consecutive aspect runs. Every lane
    /// starts out showing red at time zero.
    pub fn segments(&self, lane: LaneId) -> Vec<Segment> {
        let mut segments = vec![Segment {
            aspect: Aspect::Red,
            from_ms: 0,
            until_ms: None,
        }];
        for event in self.events_for(lane) {
            let Some(open) = segments.last_mut() else {
                continue;
            };
            if open.aspect == event.aspect {
                continue;
            }
            open.until_ms = Some(event.at_ms);
            segments.push(Segment {
                aspect: event.aspect,
                from_ms: event.at_ms,
                until_ms: None,
            });
        }
        segments.retain(|s| s.duration_ms() != Some(0));
        segments
    }

    /// Aspect shown by each lane at the given instant.
    pub fn aspects_at(&self, at_ms: u64) -> [Aspect; LANE_COUNT] {
        LaneId::ALL.map(|lane| {
            self.events_for(lane)
                .take_while(|e| e.at_ms <= at_ms)
                .last()
                .map(|e| e.aspect)
                .unwrap_or(Aspect::Red)
        })
    }

    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<(), Box<dyn Error>> {
        let mut wtr = csv::Writer::from_writer(writer);
        for event in &self.events {
            wtr.serialize(event)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_csv_to(file)?;
        log::info!("Signal events saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Draws one row per lane with each aspect as a coloured span over time.
    pub fn render_timeline(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let end_ms = self.events.iter().map(|e| e.at_ms).max().unwrap_or(0).max(1);

        let backend = BitMapBackend::new(path.as_ref(), (1200, 400));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Signal Timeline", ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0u64..end_ms, 0u32..LANE_COUNT as u32)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("time (ms)")
            .y_desc("lane")
            .draw()?;

        for lane in LaneId::ALL {
            let row = lane.index() as u32;
            chart.draw_series(self.segments(lane).into_iter().map(|segment| {
                let until = segment.until_ms.unwrap_or(end_ms);
                Rectangle::new(
                    [(segment.from_ms, row), (until, row + 1)],
                    aspect_colour(segment.aspect).filled(),
                )
            }))?;
        }

        root.present()?;
        log::info!("Signal timeline saved to {}", path.as_ref().display());
        Ok(())
    }
}

fn aspect_colour(aspect: Aspect) -> RGBColor {
    match aspect {
        Aspect::Green => RGBColor(0, 170, 0),
        Aspect::Yellow => RGBColor(240, 190, 0),
        Aspect::Red => RGBColor(200, 0, 0),
        Aspect::Dark => RGBColor(60, 60, 60),
    }
}

impl Actuator for SignalTrace {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        self.events.push(SignalEvent {
            at_ms: at.as_millis() as u64,
            lane,
            aspect,
        });
    }
}
