use crate::render::RenderSettings;

use super::ray_state::{advance, FrameCursor, Pairing};

/// Where a session is in its life: it never re-enters `Running` after
/// stopping, and a zero-frame target never enters `Running` at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running { step: u32 },
    Stopped,
}

/// Execution capability the driver is handed instead of talking to the GPU
/// directly. The production implementation records one command encoder and
/// submits it as a single unit of work; tests substitute a recording sink,
/// which is also what makes the state machine steppable without a host
/// callback loop.
pub trait FrameSink {
    fn write_step_uniform(&mut self, value: f32);
    fn dispatch_compute(&mut self, pairing: Pairing, workgroups: [u32; 2]);
    fn dispatch_render(&mut self, pairing: Pairing);
    fn submit_frame(&mut self) -> Result<(), String>;
}

/// Steps the accumulation state machine. One `step()` call performs one
/// submitted frame: uniform upload, `computes_per_frame` compute dispatches
/// (each advancing the cursor and re-deriving its pairing), one render
/// dispatch fed by the last compute result, one submission.
pub struct FrameDriver {
    state: DriverState,
    target_frames: u32,
    computes_per_frame: u32,
    workgroups: [u32; 2],
    step_encoding: crate::render::StepEncoding,
}

impl FrameDriver {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            state: DriverState::Idle,
            target_frames: settings.target_frames,
            computes_per_frame: settings.computes_per_frame,
            workgroups: settings.workgroup_counts(),
            step_encoding: settings.step_encoding,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Runs one frame through the sink and returns the new state. Calling
    /// `step` on a stopped driver is a no-op.
    pub fn step(&mut self, sink: &mut impl FrameSink) -> Result<DriverState, String> {
        let start = match self.state {
            DriverState::Idle => {
                if self.target_frames == 0 {
                    self.state = DriverState::Stopped;
                    return Ok(self.state);
                }
                self.state = DriverState::Running { step: 0 };
                0
            }
            DriverState::Running { step } => step,
            DriverState::Stopped => return Ok(self.state),
        };

        // Host-side buffer writes land before the submission executes, so
        // the uniform carries the outer step for the whole frame even when
        // several compute dispatches are folded into it.
        sink.write_step_uniform(self.step_encoding.encode(start, self.target_frames));

        let mut cursor = FrameCursor { step: start };
        let mut render_pairing = None;
        for _ in 0..self.computes_per_frame {
            let advanced = advance(cursor);
            sink.dispatch_compute(advanced.compute_pairing, self.workgroups);
            cursor = advanced.next;
            render_pairing = Some(advanced.render_pairing);
        }
        // computes_per_frame is clamped to >= 1 in RenderSettings.
        let render_pairing =
            render_pairing.ok_or_else(|| "frame executed zero compute dispatches".to_string())?;
        sink.dispatch_render(render_pairing);
        sink.submit_frame()?;

        self.state = if cursor.step >= self.target_frames {
            DriverState::Stopped
        } else {
            DriverState::Running { step: cursor.step }
        };
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::ray_state::pairing_for;
    use crate::render::settings::StepEncoding;

    #[derive(Debug, PartialEq)]
    enum Event {
        Uniform(f32),
        Compute(Pairing, [u32; 2]),
        Render(Pairing),
        Submit,
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<Event>,
    }

    impl FrameSink for RecordingSink {
        fn write_step_uniform(&mut self, value: f32) {
            self.events.push(Event::Uniform(value));
        }
        fn dispatch_compute(&mut self, pairing: Pairing, workgroups: [u32; 2]) {
            self.events.push(Event::Compute(pairing, workgroups));
        }
        fn dispatch_render(&mut self, pairing: Pairing) {
            self.events.push(Event::Render(pairing));
        }
        fn submit_frame(&mut self) -> Result<(), String> {
            self.events.push(Event::Submit);
            Ok(())
        }
    }

    fn settings(width: u32, height: u32, target_frames: u32) -> RenderSettings {
        let job = serde_json::from_str(&format!(
            r#"{{"width": {width}, "height": {height}, "outputPath": "out/f.png",
                "scene": "sphere_lab", "targetFrames": {target_frames}}}"#,
        ))
        .unwrap();
        RenderSettings::from_job(&job)
    }

    #[test]
    fn single_frame_session_runs_one_compute_and_one_render() {
        let mut driver = FrameDriver::new(&settings(4, 4, 1));
        let mut sink = RecordingSink::default();

        assert_eq!(driver.state(), DriverState::Idle);
        let state = driver.step(&mut sink).unwrap();
        assert_eq!(state, DriverState::Stopped);

        // 4x4 canvas, workgroup size 8: one workgroup per axis.
        assert_eq!(
            sink.events,
            vec![
                Event::Uniform(0.0),
                Event::Compute(pairing_for(0), [1, 1]),
                Event::Render(pairing_for(1)),
                Event::Submit,
            ]
        );
    }

    #[test]
    fn zero_target_frames_never_runs() {
        let mut driver = FrameDriver::new(&settings(4, 4, 0));
        let mut sink = RecordingSink::default();
        assert_eq!(driver.step(&mut sink).unwrap(), DriverState::Stopped);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn stopped_driver_stays_stopped() {
        let mut driver = FrameDriver::new(&settings(4, 4, 1));
        let mut sink = RecordingSink::default();
        driver.step(&mut sink).unwrap();
        let recorded = sink.events.len();
        assert_eq!(driver.step(&mut sink).unwrap(), DriverState::Stopped);
        assert_eq!(sink.events.len(), recorded);
    }

    #[test]
    fn render_always_consumes_the_region_compute_just_wrote() {
        let mut driver = FrameDriver::new(&settings(4, 4, 5));
        let mut sink = RecordingSink::default();
        while driver.step(&mut sink).unwrap() != DriverState::Stopped {}

        let mut last_write = None;
        for event in &sink.events {
            match event {
                Event::Compute(pairing, _) => last_write = Some(pairing.write),
                Event::Render(pairing) => assert_eq!(Some(pairing.read), last_write),
                _ => {}
            }
        }
    }

    #[test]
    fn compute_multiplier_folds_dispatches_into_one_submission() {
        let mut settings = settings(4, 4, 6);
        settings.computes_per_frame = 3;
        let mut driver = FrameDriver::new(&settings);
        let mut sink = RecordingSink::default();

        assert_eq!(
            driver.step(&mut sink).unwrap(),
            DriverState::Running { step: 3 }
        );
        assert_eq!(
            sink.events,
            vec![
                Event::Uniform(0.0),
                Event::Compute(pairing_for(0), [1, 1]),
                Event::Compute(pairing_for(1), [1, 1]),
                Event::Compute(pairing_for(2), [1, 1]),
                Event::Render(pairing_for(3)),
                Event::Submit,
            ]
        );

        // Second submission picks up where the cursor left off.
        sink.events.clear();
        assert_eq!(driver.step(&mut sink).unwrap(), DriverState::Stopped);
        assert_eq!(sink.events[1], Event::Compute(pairing_for(3), [1, 1]));
    }

    #[test]
    fn workgroup_counts_cover_non_multiple_grids() {
        let mut driver = FrameDriver::new(&settings(10, 17, 1));
        let mut sink = RecordingSink::default();
        driver.step(&mut sink).unwrap();
        assert_eq!(sink.events[1], Event::Compute(pairing_for(0), [2, 3]));
    }

    #[test]
    fn normalized_encoding_reaches_the_uniform() {
        let mut settings = settings(4, 4, 4);
        settings.step_encoding = StepEncoding::Normalized;
        let mut driver = FrameDriver::new(&settings);
        let mut sink = RecordingSink::default();
        driver.step(&mut sink).unwrap();
        driver.step(&mut sink).unwrap();
        let uniforms: Vec<f32> = sink
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Uniform(value) => Some(*value),
                _ => None,
            })
            .collect();
        assert_eq!(uniforms, vec![0.0, 0.25]);
    }
}
