//! PDF drawing surface built on lopdf
//!
//! All text goes through one composite (Type0, Identity-H) font so that kana, kanji
//! and Latin translations share a single embedded TrueType program. Glyph widths
//! written into the `W` array come from the same fontdue metrics used for
//! measuring, so centred text lands where the layout expects it.

use crate::config::{Color, GridSpec, TextStyle};
use crate::error::{FlashcardError, Result};
use crate::fonts::FontContext;
use crate::surface::DrawingSurface;
use log::{debug, info, warn};
use lopdf::{
    content::{Content, Operation},
    Dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use unicode_script::UnicodeScript;

/// Resource name the font is referenced by inside content streams.
const FONT_RESOURCE: &str = "F1";

/// Paginated PDF canvas.
pub struct PdfSurface {
    font_context: FontContext,
    document: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_width: f32,
    page_height: f32,
    operations: Vec<Operation>,
    used_chars: BTreeSet<char>,
    warned_chars: HashSet<char>,
    title: Option<String>,
}

impl PdfSurface {
    /// Create an empty document with pages sized by `grid`.
    pub fn new(font_context: FontContext, grid: &GridSpec) -> Self {
        let mut document = Document::with_version("1.5");

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(vec![])); // Filled by show_page
        pages_dict.set("Count", Object::Integer(0));
        let pages_id = document.add_object(Object::Dictionary(pages_dict));

        // Font objects depend on which characters end up on the pages, so only the
        // id is reserved here and the dictionary is written on save.
        let font_id = document.new_object_id();

        Self {
            font_context,
            document,
            pages_id,
            font_id,
            page_width: grid.page_width,
            page_height: grid.page_height,
            operations: Vec::new(),
            used_chars: BTreeSet::new(),
            warned_chars: HashSet::new(),
            title: None,
        }
    }

    /// Title stored in the document information dictionary.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn page_count(&self) -> usize {
        self.get_page_count().unwrap_or(0)
    }

    /// Finish the document and write it to `output_path`.
    ///
    /// The bytes go to a sibling `.tmp` file first and are renamed into place only
    /// after a complete write, so a failed run never leaves a truncated PDF behind.
    pub fn save(mut self, output_path: &Path) -> Result<()> {
        if !self.operations.is_empty() {
            self.show_page()?;
        }

        self.add_font_to_document()?;
        self.initialize_catalog();
        self.document.compress();

        let document = &mut self.document;
        write_atomically(output_path, |writer| Ok(document.save_to(writer)?))?;

        info!(
            "Saved {} pages to {}",
            self.get_page_count()?,
            output_path.display()
        );
        Ok(())
    }

    fn initialize_catalog(&mut self) {
        let mut info_dict = Dictionary::new();
        info_dict.set("Producer", Object::string_literal("Kanji Flashcards"));
        if let Some(title) = &self.title {
            info_dict.set("Title", text_string(title));
        }
        let info_id = self.document.add_object(Object::Dictionary(info_dict));

        let mut catalog_dict = Dictionary::new();
        catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog_dict.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.document.add_object(Object::Dictionary(catalog_dict));

        self.document.trailer.set("Root", Object::Reference(catalog_id));
        self.document.trailer.set("Info", Object::Reference(info_id));
    }

    fn create_resources_dict(&self) -> Object {
        let mut font_dict = Dictionary::new();
        font_dict.set(FONT_RESOURCE, Object::Reference(self.font_id));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_dict));
        Object::Dictionary(resources)
    }

    /// Register the composite font: Type0 -> CIDFontType2 -> descriptor (+ FontFile2).
    fn add_font_to_document(&mut self) -> Result<()> {
        let base_font_name = sanitize_pdf_font_name(&self.font_context.font_name);
        let (ascent, descent) = self
            .font_context
            .font
            .horizontal_line_metrics(1000.0)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((880.0, -120.0));

        let mut font_descriptor = Dictionary::new();
        font_descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
        font_descriptor.set("FontName", Object::Name(base_font_name.clone().into_bytes()));
        font_descriptor.set("Flags", Object::Integer(4));
        font_descriptor.set(
            "FontBBox",
            Object::Array(vec![
                Object::Integer(-1000),
                Object::Integer(descent.round() as i64),
                Object::Integer(2000),
                Object::Integer(ascent.round() as i64),
            ]),
        );
        font_descriptor.set("ItalicAngle", Object::Integer(0));
        font_descriptor.set("Ascent", Object::Real(ascent));
        font_descriptor.set("Descent", Object::Real(descent));
        font_descriptor.set("CapHeight", Object::Real(ascent * 0.8));
        font_descriptor.set("StemV", Object::Integer(80));

        let is_embedded = self.font_context.is_embeddable();
        if is_embedded {
            let mut stream_dict = Dictionary::new();
            stream_dict.set("Length1", Object::Integer(self.font_context.font_data.len() as i64));
            let font_stream = Stream::new(stream_dict, self.font_context.font_data.clone());
            let font_stream_id = self.document.add_object(font_stream);
            font_descriptor.set("FontFile2", Object::Reference(font_stream_id));
        } else {
            warn!(
                "Font {} is not a .ttf file and will not be embedded",
                self.font_context.font_path.display()
            );
        }
        let font_descriptor_id = self.document.add_object(Object::Dictionary(font_descriptor));

        let mut cidfont = Dictionary::new();
        cidfont.set("Type", Object::Name(b"Font".to_vec()));
        cidfont.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
        cidfont.set("BaseFont", Object::Name(base_font_name.clone().into_bytes()));
        cidfont.set("CIDSystemInfo", Object::Dictionary({
            let mut d = Dictionary::new();
            d.set("Registry", Object::string_literal("Adobe"));
            d.set("Ordering", Object::string_literal("Identity"));
            d.set("Supplement", Object::Integer(0));
            d
        }));
        cidfont.set("FontDescriptor", Object::Reference(font_descriptor_id));
        cidfont.set("DW", Object::Integer(1000));
        cidfont.set("W", Object::Array(self.create_widths_array()));
        if is_embedded {
            let map_id = self.document.add_object(self.create_cid_to_gid_map_stream());
            cidfont.set("CIDToGIDMap", Object::Reference(map_id));
        } else {
            cidfont.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
        }
        let cidfont_id = self.document.add_object(Object::Dictionary(cidfont));

        let tounicode_id = self.document.add_object(create_identity_tounicode_cmap_stream());

        let mut type0 = Dictionary::new();
        type0.set("Type", Object::Name(b"Font".to_vec()));
        type0.set("Subtype", Object::Name(b"Type0".to_vec()));
        type0.set("BaseFont", Object::Name(base_font_name.into_bytes()));
        type0.set("Encoding", Object::Name(b"Identity-H".to_vec()));
        type0.set("DescendantFonts", Object::Array(vec![Object::Reference(cidfont_id)]));
        type0.set("ToUnicode", Object::Reference(tounicode_id));

        self.document
            .objects
            .insert(self.font_id, Object::Dictionary(type0));
        Ok(())
    }

    /// `W` entries (`cid [width]`) for every character drawn.
    fn create_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::with_capacity(self.used_chars.len() * 2);
        for &ch in &self.used_chars {
            widths.push(Object::Integer(ch as i64));
            widths.push(Object::Array(vec![Object::Real(
                self.font_context.glyph_width_1000(ch),
            )]));
        }
        widths
    }

    fn create_cid_to_gid_map_stream(&self) -> Object {
        // CID equals the UTF-16 BMP code unit written into content streams.
        let mut map = vec![0u8; 65536 * 2];
        for cid in 0u32..=0xFFFF {
            if let Some(ch) = char::from_u32(cid) {
                let gid = self.font_context.font.lookup_glyph_index(ch);
                let offset = (cid as usize) * 2;
                map[offset..offset + 2].copy_from_slice(&gid.to_be_bytes());
            }
        }
        Object::Stream(Stream::new(Dictionary::new(), map))
    }

    /// Build a TJ array: runs of UTF-16BE glyph codes separated by kerning offsets.
    ///
    /// `text` must already be limited to the BMP (see [`to_bmp`]).
    fn build_tj_array(&mut self, text: &str) -> Vec<Object> {
        let chars: Vec<char> = text.chars().collect();
        let mut tj = Vec::new();
        let mut run = Vec::with_capacity(chars.len() * 2);

        for (i, &ch) in chars.iter().enumerate() {
            self.used_chars.insert(ch);
            for unit in ch.encode_utf16(&mut [0; 2]).iter() {
                run.extend_from_slice(&unit.to_be_bytes());
            }

            if let Some(&next) = chars.get(i + 1) {
                let kern = self.font_context.kerning(ch, next, 1000.0);
                if kern != 0.0 {
                    tj.push(Object::String(std::mem::take(&mut run), StringFormat::Hexadecimal));
                    // TJ offsets are subtracted from the advance.
                    tj.push(Object::Real(-kern));
                }
            }
        }

        if !run.is_empty() {
            tj.push(Object::String(run, StringFormat::Hexadecimal));
        }
        tj
    }

    /// Warn once per character the font cannot draw as written.
    fn check_glyphs(&mut self, text: &str) {
        for ch in text.chars() {
            let in_bmp = (ch as u32) <= 0xFFFF;
            if ch.is_whitespace() || (in_bmp && self.font_context.has_glyph(ch)) {
                continue;
            }
            if self.warned_chars.insert(ch) {
                warn!(
                    "Font {} cannot draw {:?} (U+{:04X}, {} script)",
                    self.font_context.font_name,
                    ch,
                    ch as u32,
                    ch.script().full_name()
                );
            }
        }
    }

    /// Append a finished page to the pages tree.
    fn add_page_to_tree(&mut self, page_id: ObjectId) -> Result<()> {
        let pages_obj = self.document.get_object_mut(self.pages_id)?;
        if let Object::Dictionary(ref mut pages_dict) = pages_obj {
            let kids = pages_dict.get_mut(b"Kids")?.as_array_mut()?;
            kids.push(Object::Reference(page_id));
            let count = kids.len() as i64;
            pages_dict.set("Count", Object::Integer(count));
            Ok(())
        } else {
            Err(FlashcardError::Render("pages object is not a dictionary".to_string()))
        }
    }

    fn get_page_count(&self) -> Result<usize> {
        let pages_obj = self.document.get_object(self.pages_id)?;
        if let Object::Dictionary(ref pages_dict) = pages_obj {
            Ok(pages_dict.get(b"Kids")?.as_array()?.len())
        } else {
            Ok(0)
        }
    }
}

impl DrawingSurface for PdfSurface {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.font_context.calculate_text_width(&to_bmp(text), font_size)
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<()> {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", color_operands(color)),
            Operation::new("w", vec![Object::Real(1.0)]),
            Operation::new(
                "re",
                vec![
                    Object::Real(x),
                    Object::Real(y),
                    Object::Real(width),
                    Object::Real(height),
                ],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn draw_centred_text(&mut self, center_x: f32, y: f32, text: &str, style: &TextStyle) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.check_glyphs(text);
        let text = to_bmp(text);
        let x = center_x - self.font_context.calculate_text_width(&text, style.font_size) / 2.0;
        let tj = self.build_tj_array(&text);

        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    Object::Real(style.font_size),
                ],
            ),
            Operation::new("rg", color_operands(style.color)),
            Operation::new(
                "Tm",
                vec![
                    Object::Real(1.0), Object::Real(0.0),
                    Object::Real(0.0), Object::Real(1.0),
                    Object::Real(x), Object::Real(y),
                ],
            ),
            Operation::new("TJ", vec![Object::Array(tj)]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn show_page(&mut self) -> Result<()> {
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content.encode()?));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set("Resources", self.create_resources_dict());
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_width),
                Object::Real(self.page_height),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));

        let page_id = self.document.add_object(Object::Dictionary(page_dict));
        self.add_page_to_tree(page_id)?;
        debug!("Emitted page {}", self.get_page_count()?);
        Ok(())
    }
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![
        Object::Real(color.r),
        Object::Real(color.g),
        Object::Real(color.b),
    ]
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn sanitize_pdf_font_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else if ch.is_whitespace() {
            out.push('-');
        }
    }
    if out.is_empty() {
        "FlashcardFont".to_string()
    } else {
        out
    }
}

/// Characters outside the BMP have no CID in the Identity-H map; they are drawn
/// and measured as U+FFFD so both agree on a single glyph.
fn to_bmp(text: &str) -> Cow<'_, str> {
    if text.chars().all(|ch| (ch as u32) <= 0xFFFF) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|ch| if (ch as u32) <= 0xFFFF { ch } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    }
}

/// Write through `write` into a sibling `.tmp` file, then rename it onto
/// `output_path`. The temporary file is removed if either step fails.
fn write_atomically<F>(output_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp_path = temporary_path(output_path);
    let written = File::create(&tmp_path)
        .map_err(FlashcardError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, output_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn temporary_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    output_path.with_file_name(name)
}

fn create_identity_tounicode_cmap_stream() -> Object {
    let cmap = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0000> <FFFF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end"
    .to_vec();
    Object::Stream(Stream::new(Dictionary::new(), cmap))
}
