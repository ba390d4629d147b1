//! DIB-based presentation for the layered windows.
//!
//! Copies a premultiplied canvas into a 32-bit BGRA bitmap, draws the
//! frame's labels with GDI, then applies it via `UpdateLayeredWindow`.

use std::mem;

use engage_core::raster::{Frame, Label};
use windows::Win32::Foundation::{COLORREF, HWND, POINT, RECT, SIZE};
use windows::Win32::Graphics::Gdi::{
    ANTIALIASED_QUALITY, BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION, CreateCompatibleDC,
    CreateDIBSection, CreateFontW, DIB_RGB_COLORS, DT_CENTER, DT_SINGLELINE, DT_VCENTER,
    DeleteDC, DeleteObject, DrawTextW, FONT_CHARSET, FONT_CLIP_PRECISION, FONT_OUTPUT_PRECISION,
    GetDC, HDC, ReleaseDC, SelectObject, SetBkMode, SetTextColor, TRANSPARENT,
};
use windows::Win32::UI::WindowsAndMessaging::{ULW_ALPHA, UpdateLayeredWindow};
use windows::core::w;

/// Presents `frame` on a layered window.
///
/// `opacity` in [0, 1] becomes the constant source alpha. `position` is
/// the new top-left in device pixels; `None` keeps the current position.
pub fn present(hwnd: HWND, frame: &Frame, opacity: f64, position: Option<(i32, i32)>) {
    let (w, h) = (frame.canvas.width, frame.canvas.height);
    if w <= 0 || h <= 0 {
        return;
    }

    unsafe {
        let screen_dc = GetDC(None);
        let mem_dc = CreateCompatibleDC(Some(screen_dc));

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: w,
                biHeight: -h, // top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut bits = std::ptr::null_mut();
        let Ok(bmp) = CreateDIBSection(Some(mem_dc), &bmi, DIB_RGB_COLORS, &mut bits, None, 0)
        else {
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(None, screen_dc);
            return;
        };
        if bits.is_null() {
            let _ = DeleteObject(bmp.into());
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(None, screen_dc);
            return;
        }

        let old_bmp = SelectObject(mem_dc, bmp.into());

        // SAFETY: `bits` is non-null (checked above) and points to
        // `w * h` pixels allocated by CreateDIBSection.
        let buf = std::slice::from_raw_parts_mut(bits as *mut u32, (w * h) as usize);
        buf.copy_from_slice(&frame.canvas.pixels);

        let _ = SetBkMode(mem_dc, TRANSPARENT);
        for label in &frame.labels {
            draw_label(mem_dc, buf, w, h, label);
        }

        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        apply_layered(hwnd, screen_dc, mem_dc, position, w, h, alpha);

        SelectObject(mem_dc, old_bmp);
        let _ = DeleteObject(bmp.into());
        let _ = DeleteDC(mem_dc);
        let _ = ReleaseDC(None, screen_dc);
    }
}

/// Draws a centered single-line label and marks its pixels opaque.
///
/// GDI leaves alpha at zero for everything it touches, so pixels that
/// changed are forced to full alpha afterwards. Labels are only drawn
/// over opaque fills, which keeps that correct for premultiplied output.
unsafe fn draw_label(dc: HDC, buf: &mut [u32], w: i32, h: i32, label: &Label) {
    if label.text.is_empty() || label.bounds.width <= 0 || label.bounds.height <= 0 {
        return;
    }
    let b = label.bounds;
    let x0 = b.x.max(0);
    let y0 = b.y.max(0);
    let x1 = b.right().min(w);
    let y1 = b.bottom().min(h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let before: Vec<u32> = (y0..y1)
        .flat_map(|y| {
            let row = (y * w) as usize;
            buf[row + x0 as usize..row + x1 as usize].to_vec()
        })
        .collect();

    unsafe {
        let font = CreateFontW(
            -label.font_px,
            0,
            0,
            0,
            if label.bold { 700 } else { 400 },
            0,
            0,
            0,
            FONT_CHARSET(0),
            FONT_OUTPUT_PRECISION(0),
            FONT_CLIP_PRECISION(0),
            ANTIALIASED_QUALITY,
            0,
            w!("Segoe UI"),
        );
        let old_font = SelectObject(dc, font.into());
        let c = label.color;
        let _ = SetTextColor(
            dc,
            COLORREF(u32::from(c.r) | (u32::from(c.g) << 8) | (u32::from(c.b) << 16)),
        );

        let mut wide: Vec<u16> = label.text.encode_utf16().collect();
        let mut rect = RECT {
            left: b.x,
            top: b.y,
            right: b.right(),
            bottom: b.bottom(),
        };
        let _ = DrawTextW(
            dc,
            &mut wide,
            &mut rect,
            DT_CENTER | DT_VCENTER | DT_SINGLELINE,
        );

        SelectObject(dc, old_font);
        let _ = DeleteObject(font.into());
    }

    let span = (x1 - x0) as usize;
    for (i, old) in before.into_iter().enumerate() {
        let (dy, dx) = (i / span, i % span);
        let idx = ((y0 as usize + dy) * w as usize) + x0 as usize + dx;
        if buf[idx] & 0x00FF_FFFF != old & 0x00FF_FFFF {
            buf[idx] |= 0xFF00_0000;
        }
    }
}

/// Calls `UpdateLayeredWindow` to atomically present the bitmap.
unsafe fn apply_layered(
    hwnd: HWND,
    screen_dc: HDC,
    mem_dc: HDC,
    position: Option<(i32, i32)>,
    w: i32,
    h: i32,
    alpha: u8,
) {
    let blend = BLENDFUNCTION {
        BlendOp: 0,                 // AC_SRC_OVER
        SourceConstantAlpha: alpha, // window-wide fade
        AlphaFormat: 1,             // AC_SRC_ALPHA
        ..Default::default()
    };
    let dst = position.map(|(x, y)| POINT { x, y });
    unsafe {
        let _ = UpdateLayeredWindow(
            hwnd,
            Some(screen_dc),
            dst.as_ref().map(|p| p as *const POINT),
            Some(&SIZE { cx: w, cy: h }),
            Some(mem_dc),
            Some(&POINT::default()),
            COLORREF(0),
            Some(&blend),
            ULW_ALPHA,
        );
    }
}
