//! Bilingual display support.
//!
//! The storefront renders in Arabic (default) or English. The active
//! locale lives in the session and every page template carries a
//! [`PageContext`] with the locale, the text direction, and the resolved
//! message table, so templates never branch on language themselves.

use tower_sessions::Session;

use crate::models::session_keys;

/// Display locale. Arabic is the default for first-time visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Arabic, right-to-left.
    #[default]
    Ar,
    /// English, left-to-right.
    En,
}

impl Locale {
    /// BCP 47 language code, also the value stored in the session.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Text direction for the `<html dir>` attribute.
    #[must_use]
    pub fn dir(self) -> &'static str {
        match self {
            Self::Ar => "rtl",
            Self::En => "ltr",
        }
    }

    /// The other locale, for the language switch link.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Ar => Self::En,
            Self::En => Self::Ar,
        }
    }

    /// Parse a stored or submitted language code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ar" => Some(Self::Ar),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// The full message table for this locale.
    #[must_use]
    pub fn messages(self) -> &'static Messages {
        match self {
            Self::Ar => &AR,
            Self::En => &EN,
        }
    }

    /// Localized text for a flash code carried in a redirect query.
    ///
    /// Unknown codes fall back to a generic message instead of leaking the
    /// raw code to the page.
    #[must_use]
    pub fn flash_message(self, code: &str) -> &'static str {
        let m = self.messages();
        match code {
            "login_required" => m.flash_login_required,
            "invalid_credentials" => m.flash_invalid_credentials,
            "signup_failed" => m.flash_signup_failed,
            "phone1_invalid" => m.flash_phone_invalid,
            "phone2_invalid" => m.flash_phone2_invalid,
            "governorate_required" => m.flash_governorate_required,
            "city_required" => m.flash_city_required,
            "street_required" => m.flash_street_required,
            "size_required" => m.flash_size_required,
            "frame_type_required" => m.flash_frame_type_required,
            "quantity_invalid" => m.flash_quantity_invalid,
            "image_required" => m.flash_image_required,
            "image_too_large" => m.flash_image_too_large,
            "submission_in_progress" => m.flash_submission_in_progress,
            "upload_failed" => m.flash_upload_failed,
            "order_failed" => m.flash_order_failed,
            "order_placed" => m.flash_order_placed,
            "custom_order_placed" => m.flash_custom_order_placed,
            _ => m.flash_generic,
        }
    }
}

/// Load the locale from the session, defaulting to Arabic.
pub async fn locale_from_session(session: &Session) -> Locale {
    session
        .get::<String>(session_keys::LOCALE)
        .await
        .ok()
        .flatten()
        .and_then(|code| Locale::from_code(&code))
        .unwrap_or_default()
}

/// Persist the locale in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_locale(
    session: &Session,
    locale: Locale,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LOCALE, locale.code()).await
}

/// Per-page render context shared by every template.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Active locale.
    pub locale: Locale,
    /// Resolved message table for the locale.
    pub t: &'static Messages,
    /// Whether a user is signed in (controls the account/login nav link).
    pub signed_in: bool,
    /// Localized flash message from a redirect, if any.
    pub flash: Option<Flash>,
}

/// A one-shot message shown at the top of a page after a redirect.
#[derive(Debug, Clone)]
pub struct Flash {
    /// Whether this is a success or error notice.
    pub is_error: bool,
    /// Localized message text.
    pub text: &'static str,
    /// Raw backend detail, shown verbatim under the message.
    pub detail: Option<String>,
}

impl PageContext {
    /// Build the context for a request.
    #[must_use]
    pub fn new(locale: Locale, signed_in: bool) -> Self {
        Self {
            locale,
            t: locale.messages(),
            signed_in,
            flash: None,
        }
    }

    /// Attach a flash resolved from redirect query parameters.
    #[must_use]
    pub fn with_flash(
        mut self,
        error: Option<&str>,
        notice: Option<&str>,
        detail: Option<String>,
    ) -> Self {
        self.flash = match (error, notice) {
            (Some(code), _) => Some(Flash {
                is_error: true,
                text: self.locale.flash_message(code),
                detail,
            }),
            (None, Some(code)) => Some(Flash {
                is_error: false,
                text: self.locale.flash_message(code),
                detail: None,
            }),
            (None, None) => None,
        };
        self
    }
}

/// Every user-facing string, per locale.
///
/// Kept as one flat struct so a missing translation is a compile error
/// rather than a runtime fallback.
#[derive(Debug)]
pub struct Messages {
    pub site_name: &'static str,
    pub nav_home: &'static str,
    pub nav_explore: &'static str,
    pub nav_trends: &'static str,
    pub nav_customize: &'static str,
    pub nav_cart: &'static str,
    pub nav_account: &'static str,
    pub sign_in: &'static str,
    pub sign_up: &'static str,
    pub sign_out: &'static str,
    pub switch_language: &'static str,

    pub home_tagline: &'static str,
    pub home_cta_explore: &'static str,
    pub home_cta_customize: &'static str,
    pub home_trending: &'static str,

    pub category_cars: &'static str,
    pub category_motorbikes: &'static str,
    pub category_art: &'static str,
    pub category_misc: &'static str,

    pub product_from: &'static str,
    pub product_size: &'static str,
    pub product_add_to_cart: &'static str,
    pub no_products: &'static str,

    pub cart_title: &'static str,
    pub cart_empty: &'static str,
    pub cart_checkout: &'static str,

    pub checkout_title: &'static str,
    pub checkout_governorate: &'static str,
    pub checkout_city: &'static str,
    pub checkout_street: &'static str,
    pub checkout_postal_code: &'static str,
    pub checkout_delivery_fee: &'static str,
    pub checkout_place_order: &'static str,

    pub customize_title: &'static str,
    pub customize_image: &'static str,
    pub customize_size: &'static str,
    pub customize_frame_type: &'static str,
    pub customize_notes: &'static str,
    pub customize_quantity: &'static str,
    pub customize_led: &'static str,
    pub customize_submit: &'static str,
    pub customize_preview: &'static str,
    pub customize_change_image: &'static str,
    pub frame_wood: &'static str,
    pub frame_metal: &'static str,
    pub frame_acrylic: &'static str,

    pub auth_email: &'static str,
    pub auth_password: &'static str,
    pub auth_name: &'static str,
    pub auth_phone: &'static str,
    pub auth_phone_secondary: &'static str,
    pub auth_no_account: &'static str,
    pub auth_have_account: &'static str,

    pub account_title: &'static str,
    pub account_orders: &'static str,
    pub account_custom_orders: &'static str,
    pub account_no_orders: &'static str,
    pub order_status: &'static str,
    pub order_total: &'static str,

    pub admin_title: &'static str,
    pub admin_recent_orders: &'static str,
    pub admin_recent_custom_orders: &'static str,

    pub flash_login_required: &'static str,
    pub flash_invalid_credentials: &'static str,
    pub flash_signup_failed: &'static str,
    pub flash_phone_invalid: &'static str,
    pub flash_phone2_invalid: &'static str,
    pub flash_governorate_required: &'static str,
    pub flash_city_required: &'static str,
    pub flash_street_required: &'static str,
    pub flash_size_required: &'static str,
    pub flash_frame_type_required: &'static str,
    pub flash_quantity_invalid: &'static str,
    pub flash_image_required: &'static str,
    pub flash_image_too_large: &'static str,
    pub flash_submission_in_progress: &'static str,
    pub flash_upload_failed: &'static str,
    pub flash_order_failed: &'static str,
    pub flash_order_placed: &'static str,
    pub flash_custom_order_placed: &'static str,
    pub flash_generic: &'static str,
}

/// English message table.
pub static EN: Messages = Messages {
    site_name: "Etar",
    nav_home: "Home",
    nav_explore: "Explore",
    nav_trends: "Trends",
    nav_customize: "Customize",
    nav_cart: "Cart",
    nav_account: "Account",
    sign_in: "Sign in",
    sign_up: "Create account",
    sign_out: "Sign out",
    switch_language: "العربية",

    home_tagline: "Frames that keep your moments alive",
    home_cta_explore: "Explore the collection",
    home_cta_customize: "Frame your own photo",
    home_trending: "Trending now",

    category_cars: "Cars",
    category_motorbikes: "Motorbikes",
    category_art: "Art",
    category_misc: "More",

    product_from: "From",
    product_size: "Size",
    product_add_to_cart: "Add to cart",
    no_products: "No products here yet.",

    cart_title: "Your cart",
    cart_empty: "Your cart is empty.",
    cart_checkout: "Checkout",

    checkout_title: "Checkout",
    checkout_governorate: "Governorate",
    checkout_city: "City",
    checkout_street: "Street address",
    checkout_postal_code: "Postal code (optional)",
    checkout_delivery_fee: "Delivery fee",
    checkout_place_order: "Place order",

    customize_title: "Custom frame order",
    customize_image: "Your photo (JPEG or PNG, up to 10 MB)",
    customize_size: "Frame size",
    customize_frame_type: "Frame material",
    customize_notes: "Notes",
    customize_quantity: "Quantity",
    customize_led: "Add LED lighting",
    customize_submit: "Submit order",
    customize_preview: "Preview photo",
    customize_change_image: "Change image",
    frame_wood: "Wood",
    frame_metal: "Metal",
    frame_acrylic: "Acrylic",

    auth_email: "Email",
    auth_password: "Password",
    auth_name: "Full name",
    auth_phone: "Phone number",
    auth_phone_secondary: "Second phone (optional)",
    auth_no_account: "No account yet?",
    auth_have_account: "Already have an account?",

    account_title: "My account",
    account_orders: "Orders",
    account_custom_orders: "Custom orders",
    account_no_orders: "No orders yet.",
    order_status: "Status",
    order_total: "Total",

    admin_title: "Dashboard",
    admin_recent_orders: "Recent orders",
    admin_recent_custom_orders: "Recent custom orders",

    flash_login_required: "Please sign in first.",
    flash_invalid_credentials: "Wrong email or password.",
    flash_signup_failed: "Could not create the account.",
    flash_phone_invalid: "Phone number must be 11 digits and start with 01.",
    flash_phone2_invalid: "The second phone number must be 11 digits and start with 01.",
    flash_governorate_required: "Please choose a governorate.",
    flash_city_required: "Please enter your city.",
    flash_street_required: "Please enter your street address.",
    flash_size_required: "Please choose a frame size.",
    flash_frame_type_required: "Please choose a frame material.",
    flash_quantity_invalid: "Quantity must be at least 1.",
    flash_image_required: "Please choose a photo.",
    flash_image_too_large: "The photo is larger than 10 MB.",
    flash_submission_in_progress: "Your previous order is still being submitted.",
    flash_upload_failed: "Uploading the photo failed. Please try again.",
    flash_order_failed: "Placing the order failed. Please try again.",
    flash_order_placed: "Order placed. We will contact you to confirm.",
    flash_custom_order_placed: "Custom order received. We will contact you to confirm.",
    flash_generic: "Something went wrong. Please try again.",
};

/// Arabic message table.
pub static AR: Messages = Messages {
    site_name: "إطار",
    nav_home: "الرئيسية",
    nav_explore: "استكشف",
    nav_trends: "الأكثر رواجًا",
    nav_customize: "صمم إطارك",
    nav_cart: "السلة",
    nav_account: "حسابي",
    sign_in: "تسجيل الدخول",
    sign_up: "إنشاء حساب",
    sign_out: "تسجيل الخروج",
    switch_language: "English",

    home_tagline: "إطارات تحفظ لحظاتك",
    home_cta_explore: "استكشف المجموعة",
    home_cta_customize: "أطّر صورتك الخاصة",
    home_trending: "الأكثر رواجًا الآن",

    category_cars: "سيارات",
    category_motorbikes: "دراجات نارية",
    category_art: "فن",
    category_misc: "المزيد",

    product_from: "ابتداءً من",
    product_size: "المقاس",
    product_add_to_cart: "أضف إلى السلة",
    no_products: "لا توجد منتجات هنا بعد.",

    cart_title: "سلتك",
    cart_empty: "سلتك فارغة.",
    cart_checkout: "إتمام الطلب",

    checkout_title: "إتمام الطلب",
    checkout_governorate: "المحافظة",
    checkout_city: "المدينة",
    checkout_street: "العنوان",
    checkout_postal_code: "الرمز البريدي (اختياري)",
    checkout_delivery_fee: "رسوم التوصيل",
    checkout_place_order: "تأكيد الطلب",

    customize_title: "طلب إطار مخصص",
    customize_image: "صورتك (JPEG أو PNG حتى 10 ميجابايت)",
    customize_size: "مقاس الإطار",
    customize_frame_type: "خامة الإطار",
    customize_notes: "ملاحظات",
    customize_quantity: "الكمية",
    customize_led: "إضافة إضاءة LED",
    customize_submit: "إرسال الطلب",
    customize_preview: "معاينة الصورة",
    customize_change_image: "تغيير الصورة",
    frame_wood: "خشب",
    frame_metal: "معدن",
    frame_acrylic: "أكريليك",

    auth_email: "البريد الإلكتروني",
    auth_password: "كلمة المرور",
    auth_name: "الاسم الكامل",
    auth_phone: "رقم الهاتف",
    auth_phone_secondary: "رقم هاتف آخر (اختياري)",
    auth_no_account: "ليس لديك حساب؟",
    auth_have_account: "لديك حساب بالفعل؟",

    account_title: "حسابي",
    account_orders: "الطلبات",
    account_custom_orders: "الطلبات المخصصة",
    account_no_orders: "لا توجد طلبات بعد.",
    order_status: "الحالة",
    order_total: "الإجمالي",

    admin_title: "لوحة التحكم",
    admin_recent_orders: "أحدث الطلبات",
    admin_recent_custom_orders: "أحدث الطلبات المخصصة",

    flash_login_required: "الرجاء تسجيل الدخول أولًا.",
    flash_invalid_credentials: "البريد الإلكتروني أو كلمة المرور غير صحيحة.",
    flash_signup_failed: "تعذر إنشاء الحساب.",
    flash_phone_invalid: "رقم الهاتف يجب أن يكون 11 رقمًا ويبدأ بـ 01.",
    flash_phone2_invalid: "رقم الهاتف الثاني يجب أن يكون 11 رقمًا ويبدأ بـ 01.",
    flash_governorate_required: "الرجاء اختيار المحافظة.",
    flash_city_required: "الرجاء إدخال المدينة.",
    flash_street_required: "الرجاء إدخال العنوان.",
    flash_size_required: "الرجاء اختيار مقاس الإطار.",
    flash_frame_type_required: "الرجاء اختيار خامة الإطار.",
    flash_quantity_invalid: "الكمية يجب أن تكون 1 على الأقل.",
    flash_image_required: "الرجاء اختيار صورة.",
    flash_image_too_large: "الصورة أكبر من 10 ميجابايت.",
    flash_submission_in_progress: "طلبك السابق ما زال قيد الإرسال.",
    flash_upload_failed: "فشل رفع الصورة. حاول مرة أخرى.",
    flash_order_failed: "فشل إرسال الطلب. حاول مرة أخرى.",
    flash_order_placed: "تم استلام طلبك. سنتواصل معك للتأكيد.",
    flash_custom_order_placed: "تم استلام طلبك المخصص. سنتواصل معك للتأكيد.",
    flash_generic: "حدث خطأ ما. حاول مرة أخرى.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_arabic() {
        assert_eq!(Locale::default(), Locale::Ar);
        assert_eq!(Locale::default().dir(), "rtl");
    }

    #[test]
    fn test_locale_codes_round_trip() {
        assert_eq!(Locale::from_code("ar"), Some(Locale::Ar));
        assert_eq!(Locale::from_code("en"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::Ar.toggled(), Locale::En);
    }

    #[test]
    fn test_flash_codes_resolve_in_both_locales() {
        assert_eq!(
            Locale::En.flash_message("image_too_large"),
            EN.flash_image_too_large
        );
        assert_eq!(
            Locale::Ar.flash_message("image_too_large"),
            AR.flash_image_too_large
        );
        // Unknown codes never leak to the page.
        assert_eq!(Locale::En.flash_message("bogus"), EN.flash_generic);
    }

    #[test]
    fn test_flash_prefers_error_over_notice() {
        let ctx = PageContext::new(Locale::En, false).with_flash(
            Some("order_failed"),
            Some("order_placed"),
            None,
        );
        let flash = ctx.flash.expect("flash present");
        assert!(flash.is_error);
        assert_eq!(flash.text, EN.flash_order_failed);
    }
}
