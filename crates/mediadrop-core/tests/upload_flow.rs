//! Integration test: drive an uploader the way a form does, feeding
//! effects back into the controlled value between events.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mediadrop_core::{
    AcceptedFileType, Effect, FileTypeRegistry, Notice, UploadController, UploadError,
    UploadResponse, UploadValue, UploadedFile, UploaderOptions,
};

/// A parent form holding the controlled value plus everything the
/// uploader's callbacks reported.
#[derive(Default)]
struct Form {
    value: UploadValue,
    names: Option<Vec<String>>,
    changes: usize,
    began: usize,
    completed: Vec<UploadedFile>,
    errors: Vec<UploadError>,
    toasts: Vec<Notice>,
}

impl Form {
    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ValueChanged(change) => {
                    self.value = change.value;
                    self.names = change.file_names;
                    self.changes += 1;
                }
                Effect::UploadBegan => self.began += 1,
                Effect::FileUploaded(file) => self.completed.push(file),
                Effect::UploadFailed(e) => self.errors.push(e),
                Effect::Notify(n) => self.toasts.push(n),
            }
        }
    }

    fn upload(&mut self, controller: &mut UploadController, files: &[(&str, &str)]) {
        let (ticket, effects) = controller.begin();
        self.apply(effects);
        assert!(controller.is_uploading());
        let responses: Vec<UploadResponse> = files
            .iter()
            .map(|(url, name)| UploadResponse {
                ufs_url: Some((*url).to_owned()),
                url: None,
                name: (*name).to_owned(),
                size: 1024,
            })
            .collect();
        let effects = controller.complete(ticket, &self.value, self.names.as_deref(), &responses);
        self.apply(effects);
    }
}

#[test]
fn single_image_lifecycle() {
    let mut controller = UploadController::new(UploaderOptions::new(AcceptedFileType::Image, 1));
    let mut form = Form::default();

    form.upload(&mut controller, &[("https://x/a.png", "a.png")]);
    assert_eq!(form.value, UploadValue::Single("https://x/a.png".into()));
    assert_eq!(form.began, 1);
    assert_eq!(form.completed.len(), 1);
    assert!(!controller.is_uploading());

    form.upload(&mut controller, &[("https://x/b.png", "b.png")]);
    assert_eq!(form.value, UploadValue::Single("https://x/b.png".into()));

    let change = controller.remove(&form.value, form.names.as_deref(), 0).unwrap();
    form.apply(vec![Effect::ValueChanged(change)]);
    assert_eq!(form.value, UploadValue::Empty);
}

#[test]
fn gallery_fills_up_then_reports_capacity() {
    let mut controller = UploadController::new(UploaderOptions::new(AcceptedFileType::Image, 3));
    let mut form = Form::default();

    form.upload(&mut controller, &[("u1", "1.png"), ("u2", "2.png")]);
    assert!(controller.can_add_more(&form.value));

    form.upload(&mut controller, &[("u3", "3.png"), ("u4", "4.png")]);
    assert_eq!(
        form.value,
        UploadValue::Multi(vec!["u1".into(), "u2".into(), "u3".into()])
    );
    assert_eq!(
        form.names.as_deref(),
        Some(["1.png".to_owned(), "2.png".into(), "3.png".into()].as_slice())
    );
    assert!(!controller.can_add_more(&form.value));
    assert_eq!(
        form.toasts,
        vec![Notice::CapacityReached {
            max_files: 3,
            dropped: 1
        }]
    );

    let change = controller.remove(&form.value, form.names.as_deref(), 1).unwrap();
    form.apply(vec![Effect::ValueChanged(change)]);
    assert_eq!(form.value, UploadValue::Multi(vec!["u1".into(), "u3".into()]));

    let change = controller.remove_all().unwrap();
    form.apply(vec![Effect::ValueChanged(change)]);
    assert_eq!(form.value, UploadValue::Multi(Vec::new()));
}

#[test]
fn unhandled_failure_is_toasted_and_form_untouched() {
    let mut controller = UploadController::new(UploaderOptions::new(AcceptedFileType::Video, 1));
    let mut form = Form {
        value: UploadValue::Single("https://x/keep.mp4".into()),
        ..Form::default()
    };

    let (ticket, effects) = controller.begin();
    form.apply(effects);
    let effects = controller.fail(
        ticket,
        UploadError::Rejected {
            status: 500,
            message: "boom".into(),
        },
    );
    form.apply(effects);

    assert_eq!(form.value, UploadValue::Single("https://x/keep.mp4".into()));
    assert_eq!(form.changes, 0);
    assert!(form.errors.is_empty());
    assert_eq!(form.toasts.len(), 1);
    assert!(form.toasts[0].to_string().contains("boom"));
}

#[test]
fn injected_registry_routes_to_fake_endpoints() {
    let json = r#"{
        "image": {
            "singleEndpoint": "testImage",
            "multiEndpoint": "testImages",
            "icon": "image",
            "defaultLabel": "Pick",
            "defaultDropzoneLabel": "Drop",
            "defaultAllowedContent": "Test images"
        }
    }"#;
    let registry: FileTypeRegistry = serde_json::from_str(json).expect("registry parses");
    assert_eq!(registry.endpoint_for(AcceptedFileType::Image, 1), "testImage");
    assert_eq!(registry.endpoint_for(AcceptedFileType::Image, 5), "testImages");
    assert_eq!(registry.endpoint_for(AcceptedFileType::Pdf, 1), "pdfUploader");
}
