#[cfg(feature = "native-export")]
mod native {
    use scribe_babel::format::{Format, SerializedDocument};
    use scribe_babel::formats::pdf::{layout, PdfFormat};
    use scribe_babel::{format_blocks, ConversionSettings, PageSettings, StructureModel};

    fn long_model() -> StructureModel {
        let content = (0..400)
            .map(|i| format!("Paragraph {i} of a chapter that keeps going well past one page."))
            .collect::<Vec<_>>()
            .join("\n");
        StructureModel::new("Long Book")
            .with_description("Long.")
            .with_chapter("Everything", content)
    }

    #[test]
    fn pdf_is_binary_and_well_formed() {
        let output = PdfFormat
            .serialize(&long_model(), &ConversionSettings::default())
            .unwrap();
        let SerializedDocument::Binary(bytes) = output else {
            panic!("PDF output must be binary");
        };
        assert!(bytes.starts_with(b"%PDF"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(16)..]).into_owned();
        assert!(tail.contains("%%EOF"));
    }

    #[test]
    fn smaller_pages_need_more_pages() {
        let settings = ConversionSettings::default();
        let blocks = format_blocks(&long_model(), &settings.export);

        let a4 = layout(&blocks, &settings.styles, &PageSettings::default()).unwrap();
        let a5 = PageSettings {
            width: 420.0,
            height: 595.0,
            margin: 40.0,
        };
        let small = layout(&blocks, &settings.styles, &a5).unwrap();
        assert!(a4.len() > 1);
        assert!(small.len() > a4.len());
    }
}
