use crate::components::section::Section;
use crate::error::SelectionError;
use crate::message::Message;
use crate::model::maxfilter::{RawLoader, SphereFitter};
use crate::model::panel::PanelState;
use crate::model::{BrowserState, RecordQuery};
use crate::utils::format_origin;
use crate::views::{browser_panel, filter_panel};
use iced::widget::text::Wrapping;
use iced::widget::{column, container, row, scrollable, text};
use iced::{application, Element, Length, Task, Theme};
use rfd::AsyncFileDialog;
use std::collections::BTreeSet;
use std::sync::Arc;

const APP_TITLE: &str = "Maxprep";

/// The three injected capabilities the app runs against. A missing query
/// backend is a configuration error caught before the UI starts.
#[derive(Clone)]
pub struct Capabilities {
    pub query: Option<Arc<dyn RecordQuery>>,
    pub loader: Arc<dyn RawLoader>,
    pub fitter: Arc<dyn SphereFitter>,
}

pub fn run(caps: Capabilities) -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let app = App::new(caps)?;
    application(APP_TITLE, App::update, App::view)
        .theme(App::theme)
        .run_with(move || (app.clone(), Task::none()))?;
    Ok(())
}

#[derive(Clone)]
pub struct App {
    query: Arc<dyn RecordQuery>,
    loader: Arc<dyn RawLoader>,
    fitter: Arc<dyn SphereFitter>,
    browser: BrowserState,
    panel: Option<PanelState>,
    collapsed_sections: BTreeSet<Section>,
    last_error: Option<String>,
}

impl App {
    pub fn new(caps: Capabilities) -> Result<Self, SelectionError> {
        let query = caps.query.ok_or(SelectionError::MissingBackend)?;
        let browser = BrowserState::new(query.as_ref());
        Ok(Self {
            query,
            loader: caps.loader,
            fitter: caps.fitter,
            browser,
            panel: None,
            collapsed_sections: BTreeSet::new(),
            last_error: None,
        })
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SubjectPicked(subject) => {
                self.browser.subject_choice = subject;
                self.browser.apply_subject(self.query.as_ref());
                self.last_error = None;
                Task::none()
            }
            Message::ModalityPicked(modality) => {
                self.browser.modality_choice = modality;
                self.browser.apply_subject(self.query.as_ref());
                self.last_error = None;
                Task::none()
            }
            Message::StudyPicked(study) => {
                self.browser.study_choice = study;
                let result = self.browser.apply_study(self.query.as_ref());
                self.report(result);
                Task::none()
            }
            Message::SeriesPicked(option) => {
                self.browser.series_choice = option;
                let result = self.browser.apply_series(self.query.as_ref());
                self.report(result);
                if self.last_error.is_none() && !self.browser.series_choice.is_sentinel() {
                    match PanelState::new(self.browser.info.clone()) {
                        Ok(panel) => self.panel = Some(panel),
                        Err(err) => {
                            self.panel = None;
                            self.last_error = Some(err.to_string());
                        }
                    }
                }
                Task::none()
            }
            Message::ToggleSection(kind) => {
                if !self.collapsed_sections.remove(&kind) {
                    self.collapsed_sections.insert(kind);
                }
                Task::none()
            }
            Message::AutobadPicked(mode) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.autobad = mode;
                }
                Task::none()
            }
            Message::BadChannelsEdited(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.bad_channels = value;
                }
                Task::none()
            }
            Message::FramePicked(frame) => {
                if let Some(panel) = &mut self.panel {
                    panel.set_frame(frame);
                }
                Task::none()
            }
            Message::TemporalSssToggled(active) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.tsss = active;
                }
                Task::none()
            }
            Message::CorrelationLimitChanged(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.set_correlation_limit(value);
                }
                Task::none()
            }
            Message::BufferLengthChanged(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.set_buffer_length(value);
                }
                Task::none()
            }
            Message::MovecompToggled(active) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.movecomp = active;
                }
                Task::none()
            }
            Message::MovecompTargetPicked(target) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.movecomp_target = target;
                }
                Task::none()
            }
            Message::YLimLowerChanged(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.set_ylim_lower(value);
                }
                Task::none()
            }
            Message::YLimUpperChanged(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.set_ylim_upper(value);
                }
                Task::none()
            }
            Message::ZLimLowerChanged(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.set_zlim_lower(value);
                }
                Task::none()
            }
            Message::ZLimUpperChanged(value) => {
                if let Some(panel) = &mut self.panel {
                    panel.params.set_zlim_upper(value);
                }
                Task::none()
            }
            Message::FitRequested => self.start_fit(),
            Message::FitCompleted(result) => {
                if let Some(panel) = &mut self.panel {
                    panel.fitting = false;
                }
                match result {
                    Ok(origin) => {
                        if let Some(panel) = &mut self.panel {
                            panel.origin_text = origin;
                        }
                        self.last_error = None;
                    }
                    Err(err) => {
                        log::error!("sphere fit failed: {err}");
                        self.last_error = Some(err);
                    }
                }
                Task::none()
            }
            Message::ExportRequested => self.start_export(),
            Message::ExportFinished(result) => {
                match result {
                    Ok(Some(path)) => {
                        log::info!("wrote maxfilter parameters to {path}");
                        self.last_error = None;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        log::error!("parameter export failed: {err}");
                        self.last_error = Some(err);
                    }
                }
                Task::none()
            }
        }
    }

    fn start_fit(&mut self) -> Task<Message> {
        let Some(panel) = &mut self.panel else {
            return Task::none();
        };
        let Some(path) = panel.files().first().cloned() else {
            return Task::none();
        };
        panel.fitting = true;

        let loader = self.loader.clone();
        let fitter = self.fitter.clone();
        let frame = panel.params.frame;
        let ylim = panel.params.ylim;
        let zlim = panel.params.zlim;

        Task::perform(
            async move {
                let raw = loader.load_info(&path)?;
                let fit = fitter.fit_sphere_to_headshape(&raw, ylim, zlim)?;
                log::info!("sphere fit residual {:.2} for {path}", fit.residual);
                Ok(format_origin(fit.origin_in(frame)))
            },
            Message::FitCompleted,
        )
    }

    fn start_export(&self) -> Task<Message> {
        let Some(panel) = &self.panel else {
            return Task::none();
        };
        let params = panel.to_params_file();

        Task::perform(
            async move {
                let Some(handle) = AsyncFileDialog::new()
                    .set_file_name("maxfilter_params.json")
                    .add_filter("JSON", &["json"])
                    .save_file()
                    .await
                else {
                    return Ok(None);
                };
                let json = serde_json::to_string_pretty(&params).map_err(|err| err.to_string())?;
                std::fs::write(handle.path(), json)
                    .map_err(|err| format!("{}: {err}", handle.path().display()))?;
                Ok(Some(handle.path().display().to_string()))
            },
            Message::ExportFinished,
        )
    }

    fn report(&mut self, result: Result<(), SelectionError>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(err) => {
                log::error!("selection failed: {err}");
                self.last_error = Some(err.to_string());
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let browser = container(scrollable(browser_panel(&self.browser)))
            .padding(16)
            .width(Length::FillPortion(2));

        let panel_content: Element<'_, Message> = match &self.panel {
            Some(panel) => {
                scrollable(filter_panel(panel, &self.collapsed_sections)).into()
            }
            None => text("Select a concrete series to configure maxfilter").into(),
        };
        let panel = container(panel_content)
            .padding(16)
            .width(Length::FillPortion(3));

        let mut content = column![row![browser, panel]
            .spacing(16)
            .width(Length::Fill)
            .height(Length::Fill)]
        .spacing(16);

        if let Some(error) = &self.last_error {
            content = content.push(text(error).size(16).wrapping(Wrapping::Word));
        }

        content.padding(20).into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::maxfilter::SssFrame;
    use crate::model::panel::ORIGIN_UNSET;
    use crate::model::series::SeriesOption;
    use crate::sample::{SampleDatabase, SampleFitter, SampleLoader};

    fn sample_caps() -> Capabilities {
        Capabilities {
            query: Some(Arc::new(SampleDatabase::seeded())),
            loader: Arc::new(SampleLoader),
            fitter: Arc::new(SampleFitter::default()),
        }
    }

    fn select_rest_series(app: &mut App) {
        let _ = app.update(Message::SubjectPicked("0001".to_string()));
        let _ = app.update(Message::StudyPicked("2020-01-02".to_string()));
        let _ = app.update(Message::SeriesPicked(SeriesOption {
            name: "rest".to_string(),
            id: 1,
        }));
    }

    #[test]
    fn missing_backend_fails_fast() {
        let caps = Capabilities {
            query: None,
            loader: Arc::new(SampleLoader),
            fitter: Arc::new(SampleFitter::default()),
        };
        assert!(matches!(
            App::new(caps),
            Err(SelectionError::MissingBackend)
        ));
    }

    #[test]
    fn concrete_series_builds_the_panel() {
        let mut app = App::new(sample_caps()).unwrap();
        select_rest_series(&mut app);

        let panel = app.panel.as_ref().unwrap();
        assert_eq!(panel.snapshot.series_name.as_deref(), Some("rest"));
        assert_eq!(panel.files().len(), 1);
        assert!(app.last_error.is_none());
    }

    #[test]
    fn sentinel_series_keeps_the_existing_panel() {
        let mut app = App::new(sample_caps()).unwrap();
        select_rest_series(&mut app);

        let _ = app.update(Message::SeriesPicked(SeriesOption::sentinel()));

        let panel = app.panel.as_ref().unwrap();
        assert_eq!(panel.snapshot.series_name.as_deref(), Some("rest"));
        assert!(app.browser.files_display.is_empty());
    }

    #[test]
    fn series_without_file_listing_drops_the_panel() {
        let mut app = App::new(sample_caps()).unwrap();
        select_rest_series(&mut app);

        let _ = app.update(Message::StudyPicked("2020-01-01".to_string()));
        let _ = app.update(Message::SeriesPicked(SeriesOption {
            name: "rest".to_string(),
            id: 1,
        }));

        assert!(app.panel.is_none());
        assert!(app.last_error.is_some());
    }

    #[test]
    fn frame_switch_resets_the_origin_field() {
        let mut app = App::new(sample_caps()).unwrap();
        select_rest_series(&mut app);

        app.panel.as_mut().unwrap().origin_text = "0.0 10.0 40.0".to_string();
        let _ = app.update(Message::FramePicked(SssFrame::Device));

        assert_eq!(app.panel.as_ref().unwrap().origin_text, ORIGIN_UNSET);
    }

    #[test]
    fn unknown_series_id_surfaces_a_lookup_error() {
        let mut app = App::new(sample_caps()).unwrap();
        let _ = app.update(Message::SubjectPicked("0001".to_string()));
        let _ = app.update(Message::StudyPicked("2020-01-02".to_string()));

        let _ = app.update(Message::SeriesPicked(SeriesOption {
            name: "ghost".to_string(),
            id: 9,
        }));

        assert!(app
            .last_error
            .as_deref()
            .is_some_and(|err| err.contains("series id 9")));
    }
}
